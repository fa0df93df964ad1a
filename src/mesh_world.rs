use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, RayCast, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::{Cuboid, TriMesh};

use crate::error::WorldError;
use crate::query::{CollisionQuery, Contact, Hull, Penetration, SurfaceId};

// glam <-> nalgebra conversions for parry3d 0.20. Nothing outside this file
// sees nalgebra types; drop these once parry3d takes glam directly (0.26).
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn hull_pose(hull: &Hull, origin: Vec3) -> (Isometry<Real>, Cuboid) {
    let center = hull.center(origin);
    (
        Isometry::translation(center.x, center.y, center.z),
        Cuboid::new(to_vector(hull.half_extents)),
    )
}

struct MeshCollider {
    trimesh: TriMesh,
    surface: SurfaceId,
}

/// Static triangle-mesh geometry, such as a level's collision mesh.
#[derive(Default)]
pub struct MeshWorld {
    meshes: Vec<MeshCollider>,
}

impl MeshWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world holding a single mesh.
    pub fn from_mesh(
        collision_vertices: &[Vec3],
        collision_indices: &[[u32; 3]],
    ) -> Result<Self, WorldError> {
        let mut world = Self::new();
        world.add_mesh(collision_vertices, collision_indices)?;
        Ok(world)
    }

    pub fn add_mesh(
        &mut self,
        collision_vertices: &[Vec3],
        collision_indices: &[[u32; 3]],
    ) -> Result<SurfaceId, WorldError> {
        if collision_vertices.is_empty() || collision_indices.is_empty() {
            return Err(WorldError::EmptyMesh);
        }
        if let Some(&index) = collision_indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= collision_vertices.len())
        {
            return Err(WorldError::IndexOutOfRange {
                index,
                vertex_count: collision_vertices.len(),
            });
        }

        let vertices: Vec<Point<Real>> = collision_vertices
            .iter()
            .map(|v| Point::new(v.x, v.y, v.z))
            .collect();

        let trimesh = TriMesh::new(vertices, collision_indices.to_vec())?;
        let surface = SurfaceId(self.meshes.len() as u32);
        self.meshes.push(MeshCollider { trimesh, surface });
        log::debug!(
            "Added collision mesh {:?}: {} triangles",
            surface,
            collision_indices.len()
        );
        Ok(surface)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl CollisionQuery for MeshWorld {
    fn cast_hull(
        &self,
        hull: &Hull,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Contact> {
        let (pose, cuboid) = hull_pose(hull, origin);
        let velocity = to_vector(direction);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            stop_at_penetration: false,
            ..ShapeCastOptions::default()
        };

        let mut nearest: Option<Contact> = None;
        for mesh in &self.meshes {
            let hit = match query::cast_shapes(
                &pose,
                &velocity,
                &cuboid,
                &Isometry::identity(),
                &Vector::zeros(),
                &mesh.trimesh,
                options,
            ) {
                Ok(Some(hit)) => hit,
                _ => continue,
            };
            if matches!(hit.status, ShapeCastStatus::Failed) {
                continue;
            }
            // normal1 is the hull's outward normal, pointing into the mesh
            let normal = -to_vec3(&hit.normal1);
            if nearest.map_or(true, |n| hit.time_of_impact < n.distance) {
                nearest = Some(Contact {
                    distance: hit.time_of_impact,
                    normal,
                    surface: mesh.surface,
                });
            }
        }
        nearest
    }

    fn overlaps(&self, hull: &Hull, origin: Vec3) -> bool {
        let (pose, cuboid) = hull_pose(hull, origin);
        self.meshes.iter().any(|mesh| {
            query::intersection_test(&pose, &cuboid, &Isometry::identity(), &mesh.trimesh)
                .unwrap_or(false)
        })
    }

    fn penetration(&self, hull: &Hull, origin: Vec3) -> Option<Penetration> {
        let (pose, cuboid) = hull_pose(hull, origin);
        self.meshes
            .iter()
            .filter_map(|mesh| {
                match query::contact(&pose, &cuboid, &Isometry::identity(), &mesh.trimesh, 0.0) {
                    Ok(Some(contact)) if contact.dist < 0.0 => Some(Penetration {
                        direction: -to_vec3(&contact.normal1),
                        distance: -contact.dist,
                    }),
                    _ => None,
                }
            })
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact> {
        let ray = Ray::new(Point::new(origin.x, origin.y, origin.z), to_vector(direction));
        let mut nearest: Option<Contact> = None;
        for mesh in &self.meshes {
            if let Some(hit) =
                mesh.trimesh
                    .cast_ray_and_get_normal(&Isometry::identity(), &ray, max_distance, true)
            {
                let mut normal = to_vec3(&hit.normal).normalize_or_zero();
                // Triangles are two-sided; face the normal back toward the ray
                if normal.dot(direction) > 0.0 {
                    normal = -normal;
                }
                if nearest.map_or(true, |n| hit.time_of_impact < n.distance) {
                    nearest = Some(Contact {
                        distance: hit.time_of_impact,
                        normal,
                        surface: mesh.surface,
                    });
                }
            }
        }
        nearest
    }
}
