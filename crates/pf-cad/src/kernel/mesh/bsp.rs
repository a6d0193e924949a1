//! BSP tree for mesh booleans.
//!
//! Follows csg.js node semantics. Every traversal uses an explicit stack, so
//! deep trees (long chains from convex solids with many faces) never recurse.

use super::plane::Plane;
use super::polygon::Polygon;

/// A BSP tree node.
#[derive(Debug, Default)]
pub(crate) struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<Polygon>,
}

impl BspNode {
    /// Build a tree from a polygon soup.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Convert solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Remove the parts of `polygons` that are inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::with_capacity(polygons.len());
        let mut stack: Vec<(&BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in &polygons {
                // Coplanar polygons follow their facing.
                let (mut coplanar_front, mut coplanar_back) = (Vec::new(), Vec::new());
                polygon.split(
                    plane,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
                front.append(&mut coplanar_front);
                back.append(&mut coplanar_back);
            }

            match node.front.as_deref() {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // Without a back child, back polygons are inside the solid.
            if let Some(child) = node.back.as_deref() {
                stack.push((child, back));
            }
        }
        result
    }

    /// Remove all polygons in this tree that are inside `other`.
    pub fn clip_to(&mut self, other: &BspNode) {
        let mut stack: Vec<&mut BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Collect every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];
        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());
            if let Some(front) = node.front.as_deref() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref() {
                stack.push(back);
            }
        }
        result
    }

    /// Insert polygons into the tree, splitting them where needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack: Vec<(&mut BspNode, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }
            let plane = *node.plane.get_or_insert(polygons[0].plane);

            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar = Vec::new();
            for polygon in &polygons {
                let mut coplanar_back = Vec::new();
                polygon.split(&plane, &mut coplanar, &mut coplanar_back, &mut front, &mut back);
                coplanar.append(&mut coplanar_back);
            }
            node.polygons.append(&mut coplanar);

            if !front.is_empty() {
                let child = node.front.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), front));
            }
            if !back.is_empty() {
                let child = node.back.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), back));
            }
        }
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        // Unlink children first so dropping a deep chain does not recurse.
        let mut stack: Vec<Box<BspNode>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}
