use glam::DVec3;

/// Which of the two measurement points the next pick overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivePoint {
    /// The first point.
    #[default]
    A,
    /// The second point.
    B,
}

impl ActivePoint {
    /// `0` for A, `1` for B.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// The other point.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Two measurement points in millimeters and the one being edited.
///
/// Lives as long as the tool; survives activate/deactivate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    points: [DVec3; 2],
    active: ActivePoint,
}

impl Measurement {
    /// Both points at the origin, A active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First point.
    #[must_use]
    pub fn point_a(&self) -> DVec3 {
        self.points[0]
    }

    /// Second point.
    #[must_use]
    pub fn point_b(&self) -> DVec3 {
        self.points[1]
    }

    /// Both points, A first.
    #[must_use]
    pub fn points(&self) -> [DVec3; 2] {
        self.points
    }

    /// The vector from A to B.
    #[must_use]
    pub fn distance(&self) -> DVec3 {
        self.points[1] - self.points[0]
    }

    /// The active point selector.
    #[must_use]
    pub fn active(&self) -> ActivePoint {
        self.active
    }

    /// Select the active point. Returns whether it changed.
    pub fn set_active(&mut self, active: ActivePoint) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    /// Overwrite the active point. Returns whether it changed.
    pub fn write_active(&mut self, point: DVec3) -> bool {
        let slot = &mut self.points[self.active.index()];
        let changed = *slot != point;
        *slot = point;
        changed
    }

    /// Back to the initial state. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        let changed = *self != Self::default();
        *self = Self::default();
        changed
    }

    /// An immutable copy of every derived output.
    #[must_use]
    pub fn snapshot(&self) -> MeasurementSnapshot {
        MeasurementSnapshot {
            point_a: self.point_a(),
            point_b: self.point_b(),
            distance: self.distance(),
            active_point: self.active,
        }
    }
}

/// What observers receive after each change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSnapshot {
    /// First point (mm).
    pub point_a: DVec3,
    /// Second point (mm).
    pub point_b: DVec3,
    /// `point_b - point_a`.
    pub distance: DVec3,
    /// Point the next pick overwrites.
    pub active_point: ActivePoint,
}

impl MeasurementSnapshot {
    /// Euclidean length of [`Self::distance`].
    #[must_use]
    pub fn length(&self) -> f64 {
        self.distance.length()
    }
}
