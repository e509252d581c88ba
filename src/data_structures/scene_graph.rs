//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] owns a tree of [`SceneNode`]s. Nodes carry a local transform
//! and a cached world transform, and may expose a [`Mesh`] or a [`Light`].
//! Nodes are added once when the scene is composed and live as long as the
//! scene does.

use std::sync::atomic::{AtomicU32, Ordering};

use instant::Duration;
use log::warn;

use crate::{
    color::Color,
    data_structures::{
        geometry::Geometry,
        material::{GradientMaterial, PhongMaterial},
        transform::Transform,
    },
};

static NEXT_MESH_ID: AtomicU32 = AtomicU32::new(1);

fn next_mesh_id() -> u32 {
    NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed)
}

/// Geometry paired with a material.
///
/// The `id` is unique per process and lets renderers cache GPU buffers.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub id: u32,
    pub geometry: Geometry,
    pub material: PhongMaterial,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: PhongMaterial) -> Self {
        Self {
            id: next_mesh_id(),
            geometry,
            material,
        }
    }
}

/// Light sources. Positions come from the owning node's world transform.
#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    /// Sky colour from above fading into ground colour from below.
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    /// Parallel rays shining from the node's position towards the origin.
    Directional { color: Color, intensity: f32 },
    /// Omnidirectional light whose intensity falls off with `distance^-decay`.
    Point {
        color: Color,
        intensity: f32,
        decay: f32,
    },
}

pub trait SceneNode {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> Transform;

    fn set_local_transform(&mut self, transform: Transform);

    fn get_world_transform(&self) -> Transform;

    /// Recompute `world = parent * local` for this node and all descendants.
    fn update_world_transform(&mut self, parent: &Transform);

    /// Advance per-object state by `dt`. Called once per frame by the render loop.
    fn update(&mut self, dt: Duration);

    fn get_mesh(&self) -> Option<&Mesh> {
        None
    }

    fn get_light(&self) -> Option<&Light> {
        None
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.get_children_mut().push(child);
    }
}

/// State every node kind shares: name, transforms and children.
#[derive(Default)]
pub struct NodeBase {
    pub name: String,
    pub local: Transform,
    pub world: Transform,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl NodeBase {
    pub fn new(name: impl Into<String>, local: Transform) -> Self {
        Self {
            name: name.into(),
            local,
            world: local,
            children: Vec::new(),
        }
    }

    pub fn update_world_transform(&mut self, parent: &Transform) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transform(&world);
        }
    }

    pub fn update_children(&mut self, dt: Duration) {
        for child in self.children.iter_mut() {
            child.update(dt);
        }
    }
}

macro_rules! delegate_node_base {
    ($field:ident) => {
        fn name(&self) -> &str {
            &self.$field.name
        }

        fn get_local_transform(&self) -> Transform {
            self.$field.local
        }

        fn set_local_transform(&mut self, transform: Transform) {
            self.$field.local = transform;
        }

        fn get_world_transform(&self) -> Transform {
            self.$field.world
        }

        fn update_world_transform(&mut self, parent: &Transform) {
            self.$field.update_world_transform(parent);
        }

        fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
            &self.$field.children
        }

        fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
            &mut self.$field.children
        }
    };
}
pub(crate) use delegate_node_base;

/// A node without content of its own, used to group children.
pub struct ContainerNode {
    base: NodeBase,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(name, Transform::default()),
        }
    }
}

impl SceneNode for ContainerNode {
    delegate_node_base!(base);

    fn update(&mut self, dt: Duration) {
        self.base.update_children(dt);
    }
}

/// A node that draws a mesh and has no behaviour of its own.
pub struct MeshNode {
    base: NodeBase,
    mesh: Mesh,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            base: NodeBase::new(name, Transform::default()),
            mesh,
        }
    }
}

impl SceneNode for MeshNode {
    delegate_node_base!(base);

    fn update(&mut self, dt: Duration) {
        self.base.update_children(dt);
    }

    fn get_mesh(&self) -> Option<&Mesh> {
        Some(&self.mesh)
    }
}

/// A node that emits light from its world position.
pub struct LightNode {
    base: NodeBase,
    light: Light,
}

impl LightNode {
    pub fn new(name: impl Into<String>, light: Light, position: cgmath::Vector3<f32>) -> Self {
        Self {
            base: NodeBase::new(name, position.into()),
            light,
        }
    }
}

impl SceneNode for LightNode {
    delegate_node_base!(base);

    fn update(&mut self, dt: Duration) {
        self.base.update_children(dt);
    }

    fn get_light(&self) -> Option<&Light> {
        Some(&self.light)
    }
}

/// Full-screen quad with a radial gradient, drawn behind the scene without depth.
#[derive(Clone, Debug)]
pub struct Backdrop {
    pub id: u32,
    pub geometry: Geometry,
    pub material: GradientMaterial,
}

impl Backdrop {
    pub fn new(material: GradientMaterial) -> Self {
        Self {
            id: next_mesh_id(),
            // Spans clip space from -1 to 1 on both axes.
            geometry: Geometry::plane(2.0, 2.0),
            material,
        }
    }
}

/// Root of the scene graph plus scene-wide settings.
pub struct Scene {
    pub background: Color,
    root: ContainerNode,
    backdrop: Option<Backdrop>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            root: ContainerNode::new("scene"),
            backdrop: None,
        }
    }

    /// Attach `node` to the root and compute its world transforms.
    pub fn add(&mut self, mut node: Box<dyn SceneNode>) {
        if self.find(node.name()).is_some() {
            warn!("Scene already contains a node named {}", node.name());
        }
        node.update_world_transform(&self.root.get_world_transform());
        self.root.add_child(node);
    }

    pub fn set_backdrop(&mut self, backdrop: Option<Backdrop>) {
        self.backdrop = backdrop;
    }

    pub fn backdrop(&self) -> Option<&Backdrop> {
        self.backdrop.as_ref()
    }

    /// Run every node's `update` and refresh world transforms.
    pub fn update(&mut self, dt: Duration) {
        self.root.update(dt);
        self.root.update_world_transform(&Transform::default());
    }

    pub fn nodes(&self) -> &Vec<Box<dyn SceneNode>> {
        self.root.get_children()
    }

    /// Number of nodes in the tree, excluding the root.
    pub fn node_count(&self) -> usize {
        fn count(node: &dyn SceneNode) -> usize {
            1 + node.get_children().iter().map(|c| count(c.as_ref())).sum::<usize>()
        }
        count(&self.root) - 1
    }

    pub fn find(&self, name: &str) -> Option<&dyn SceneNode> {
        fn search<'a>(node: &'a dyn SceneNode, name: &str) -> Option<&'a dyn SceneNode> {
            if node.name() == name {
                return Some(node);
            }
            node.get_children()
                .iter()
                .find_map(|child| search(child.as_ref(), name))
        }
        self.root
            .get_children()
            .iter()
            .find_map(|child| search(child.as_ref(), name))
    }

    /// All meshes in depth-first order with their world transforms.
    pub fn meshes(&self) -> Vec<(&Mesh, Transform)> {
        fn collect<'a>(node: &'a dyn SceneNode, out: &mut Vec<(&'a Mesh, Transform)>) {
            if let Some(mesh) = node.get_mesh() {
                out.push((mesh, node.get_world_transform()));
            }
            for child in node.get_children() {
                collect(child.as_ref(), out);
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// All lights in depth-first order with their world transforms.
    pub fn lights(&self) -> Vec<(&Light, Transform)> {
        fn collect<'a>(node: &'a dyn SceneNode, out: &mut Vec<(&'a Light, Transform)>) {
            if let Some(light) = node.get_light() {
                out.push((light, node.get_world_transform()));
            }
            for child in node.get_children() {
                collect(child.as_ref(), out);
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }
}
