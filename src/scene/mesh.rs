use glam::{Mat4, Vec3};

/// Indexed triangle geometry in local (model) space, in millimeters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh from vertex positions and a triangle-list index buffer.
    ///
    /// A trailing partial triangle is ignored, as are triangles that
    /// reference a vertex past the end of `positions`.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle-list indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns `true` if the mesh has no drawable triangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles().next().is_none()
    }

    /// Number of complete triangles in the index buffer.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the mesh's triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }

    /// Iterate the triangles with `transform` applied to every corner.
    pub fn transformed_triangles(
        &self,
        transform: Mat4,
    ) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles()
            .map(move |tri| tri.map(|p| transform.transform_point3(p)))
    }

    /// A flat rectangle in the XZ plane at `y = 0`, centered on the origin.
    ///
    /// This is the shape of the build plate.
    #[must_use]
    pub fn plane(width: f32, depth: f32) -> Self {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        Self::new(
            vec![
                Vec3::new(-hw, 0.0, -hd),
                Vec3::new(hw, 0.0, -hd),
                Vec3::new(hw, 0.0, hd),
                Vec3::new(-hw, 0.0, hd),
            ],
            vec![0, 2, 1, 0, 3, 2],
        )
    }

    /// An axis-aligned box spanning `min` to `max`.
    #[must_use]
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let positions = vec![
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 7, 6, 3, 6, 2, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self::new(positions, indices)
    }
}
