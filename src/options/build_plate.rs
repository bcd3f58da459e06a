use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Build Plate", inline)]
#[serde(default)]
/// The synthetic surface picks fall back to around the objects.
pub struct BuildPlateOptions {
    /// Draw the plate into the coordinate passes.
    #[schemars(title = "Pick on Build Plate")]
    pub enabled: bool,
    /// Plate extent along X in millimeters.
    #[schemars(title = "Width", range(min = 1.0, max = 2000.0), extend("step" = 1.0))]
    pub width: f32,
    /// Plate extent along Z in millimeters.
    #[schemars(title = "Depth", range(min = 1.0, max = 2000.0), extend("step" = 1.0))]
    pub depth: f32,
    /// Shift along Y that keeps the plate from z-fighting with object
    /// bottoms.
    #[schemars(skip)]
    pub offset: f32,
}

impl Default for BuildPlateOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 220.0,
            depth: 220.0,
            offset: -0.05,
        }
    }
}
