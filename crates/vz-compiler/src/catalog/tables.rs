//! Name tables the builtin definitions are generated from.

pub const MATH_UNARY_FUNCTIONS: &[&str] = &[
    "abs", "floor", "ceiling", "round", "sqrt", "sin", "cos", "tan", "asin", "acos", "atan", "ln",
    "log", "deg2rad", "rad2deg",
];

pub const MATH_BINARY_FUNCTION_STYLES: &[(&str, &str)] = &[
    ("rand", "op-rand"),
    ("min", "op-min"),
    ("max", "op-max"),
    ("atan2", "op-atan-2"),
];

pub const VECTOR_UNARY_OPS: &[&str] = &["x", "y", "z", "length", "norm"];

pub const VECTOR_BINARY_OPS: &[&str] = &[
    "angle", "clamp", "cross", "dot", "dist", "min", "max", "project", "scale",
];

pub const FRIENDLY_STRING_FORMATS: &[&str] = &[
    "distance",
    "pressure",
    "temperature",
    "velocity",
    "force",
    "mass",
    "density",
    "time",
];

/// `crafts` appears twice; the duplicate is part of the observed table.
pub const PLANET_BASIC_OPS: &[&str] = &[
    "mass",
    "radius",
    "hasTerrain",
    "atmosphereDensity",
    "atmosphereHeight",
    "soiradius",
    "solarPosition",
    "childPlanets",
    "crafts",
    "crafts",
    "craftids",
    "parent",
    "structures",
    "day",
    "year",
    "velocity",
    "apoapsis",
    "periapsis",
    "period",
    "apoapsistime",
    "periapsistime",
    "inclination",
    "eccentricity",
    "meananomaly",
    "meanmotion",
    "periapsisargument",
    "rightascension",
    "trueanomaly",
    "semimajoraxis",
    "semiminoraxis",
];

pub const PLANET_POSITION_OPS: &[(&str, &str)] = &[
    ("toLatLongAgl", "planet-to-lat-long-agl"),
    ("toLatLongAsl", "planet-to-lat-long-asl"),
    ("toPosition", "planet-to-position"),
    ("toPositionOverSea", "planet-to-position-asl"),
];

pub const LIST_OPS: &[(&str, usize)] = &[("create", 1), ("get", 2), ("length", 1), ("index", 2)];

pub const LIST_INSTRUCTIONS: &[(&str, usize)] = &[
    ("add", 2),
    ("insert", 3),
    ("remove", 2),
    ("set", 3),
    ("clear", 1),
    ("sort", 1),
    ("reverse", 1),
];

pub const INPUTS: &[&str] = &[
    "Roll",
    "Pitch",
    "Yaw",
    "Throttle",
    "Brake",
    "Slider1",
    "Slider2",
    "Slider3",
    "Slider4",
    "TranslateForward",
    "TranslateRight",
    "TranslateUp",
    "TranslationMode",
];

pub const CAMERA_PROPERTIES: &[&str] = &["Zoom", "ModeIndex", "CameraIndex", "TiltX", "TiltY"];

pub const TIME_MODES: &[&str] = &[
    "Paused",
    "SlowMotion",
    "Normal",
    "FastForward",
    "TimeWarp1",
    "TimeWarp2",
    "TimeWarp3",
    "TimeWarp4",
    "TimeWarp5",
    "TimeWarp6",
    "TimeWarp7",
    "TimeWarp8",
    "TimeWarp9",
    "TimeWarp10",
];

pub const INDICATOR_TYPES: &[&str] = &[
    "None",
    "Prograde",
    "Retrograde",
    "Target",
    "BurnNode",
    "Current",
];

/// Autopilot setter identifier and the `property` attribute it writes.
pub const AUTOPILOT_HEADING_SETTERS: &[(&str, &str)] = &[
    ("Nav.SetAutopilotHeading", "heading"),
    ("Nav.SetAutopilotPitch", "pitch"),
    ("Misc.SetPidPitch", "pid-pitch"),
    ("Misc.SetPidRoll", "pid-roll"),
];

pub fn heading_setter_for_property(property: &str) -> Option<&'static str> {
    AUTOPILOT_HEADING_SETTERS
        .iter()
        .find(|(_, attribute)| *attribute == property)
        .map(|(identifier, _)| *identifier)
}

pub const ALTITUDE_PROPERTIES: &[&str] = &["Altitude.AGL", "Altitude.ASL", "Altitude.ASF"];

pub const ORBIT_PROPERTIES: &[&str] = &[
    "Orbit.Apoapsis",
    "Orbit.Periapsis",
    "Orbit.TimeToApoapsis",
    "Orbit.TimeToPeriapsis",
    "Orbit.Eccentricity",
    "Orbit.Inclination",
    "Orbit.Period",
];

pub const ATMOSPHERE_PROPERTIES: &[&str] = &[
    "Atmosphere.AirDensity",
    "Atmosphere.AirPressure",
    "Atmosphere.SpeedOfSound",
    "Atmosphere.Temperature",
];

pub const PERFORMANCE_PROPERTIES: &[&str] = &[
    "Performance.CurrentEngineThrust",
    "Performance.Mass",
    "Performance.DryMass",
    "Performance.FuelMass",
    "Performance.MaxActiveEngineThrust",
    "Performance.TWR",
    "Performance.CurrentIsp",
    "Performance.StageDeltaV",
    "Performance.BurnTime",
];

pub const FUEL_PROPERTIES: &[&str] = &[
    "Fuel.Battery",
    "Fuel.FuelInStage",
    "Fuel.Mono",
    "Fuel.AllStages",
];

pub const NAV_PROPERTIES: &[&str] = &[
    "Nav.Position",
    "Target.Position",
    "Nav.CraftHeading",
    "Nav.Pitch",
    "Nav.AutopilotHeading",
    "Nav.AutopilotPitch",
    "Nav.BankAngle",
    "Nav.AngleOfAttack",
    "Nav.SideSlip",
    "Nav.North",
    "Nav.East",
    "Nav.CraftDirection",
    "Nav.CraftRight",
    "Nav.CraftUp",
];

pub const VELOCITY_PROPERTIES: &[&str] = &[
    "Vel.SurfaceVelocity",
    "Vel.OrbitVelocity",
    "Target.Velocity",
    "Vel.Gravity",
    "Vel.Drag",
    "Vel.Acceleration",
    "Vel.AngularVelocity",
    "Vel.LateralSurfaceVelocity",
    "Vel.VerticalSurfaceVelocity",
    "Vel.MachNumber",
];

pub const MISC_PROPERTIES: &[&str] = &[
    "Misc.Stage",
    "Misc.NumStages",
    "Misc.Grounded",
    "Misc.SolarRadiation",
    "Misc.CameraPosition",
    "Misc.CameraPointing",
    "Misc.CameraUp",
    "Misc.PidPitch",
    "Misc.PidRoll",
];

pub const TIME_PROPERTIES: &[&str] = &[
    "Time.FrameDeltaTime",
    "Time.TimeSinceLaunch",
    "Time.TotalTime",
    "Time.WarpAmount",
    "Time.RealTime",
];

pub const NAME_PROPERTIES: &[&str] = &["Name.Craft", "Orbit.Planet", "Target.Name", "Target.Planet"];

pub const TERRAIN_PROPERTIES: &[&str] = &["Terrain.Color", "Terrain.Height"];

pub const PART_PROPERTIES: &[&str] = &[
    "Part.IDToName",
    "Part.Mass",
    "Part.DryMass",
    "Part.WetMass",
    "Part.Activated",
    "Part.PartType",
    "Part.Position",
    "Part.Temperature",
    "Part.Drag",
    "Part.ThisID",
    "Part.MinID",
    "Part.MaxID",
    "Part.UnderWater",
];

pub const CRAFT_PROPERTIES: &[&str] = &[
    "Craft.Altitude",
    "Craft.Destroyed",
    "Craft.Grounded",
    "Craft.Mass",
    "Craft.IDToName",
    "Craft.PartCount",
    "Craft.Planet",
    "Craft.Position",
    "Craft.Velocity",
    "Craft.IsPlayer",
    "Craft.BoundMin",
    "Craft.BoundMax",
    "Craft.Apoapsis",
    "Craft.Periapsis",
    "Craft.Period",
    "Craft.ApoapsisTime",
    "Craft.PeriapsisTime",
    "Craft.Inclination",
    "Craft.Eccentricity",
    "Craft.MeanAnomaly",
    "Craft.MeanMotion",
    "Craft.PeriapsisArgument",
    "Craft.RightAscension",
    "Craft.TrueAnomaly",
    "Craft.SemiMajorAxis",
    "Craft.SemiMinorAxis",
];

pub const CRAFT_PART_SETTERS: &[&str] = &[
    "Part.SetActivated",
    "Part.SetFocused",
    "Part.SetName",
    "Part.SetExplode",
    "Part.FuelTransfer",
];

pub const MFD_WIDGET_TYPES: &[&str] = &[
    "Ellipse",
    "Label",
    "Line",
    "RadialGauge",
    "Rectangle",
    "Texture",
    "Navball",
    "Map",
];

pub const MFD_WIDGET_PROPERTIES: &[&str] = &[
    "AnchoredPosition",
    "AnchorMin",
    "AnchorMax",
    "Color",
    "Opacity",
    "Parent",
    "Pivot",
    "Position",
    "Rotation",
    "Scale",
    "Size",
    "Visible",
];

pub const MFD_ANCHOR_POSITIONS: &[&str] = &[
    "Left",
    "Center",
    "Right",
    "TopLeft",
    "TopCenter",
    "TopRight",
    "BottomLeft",
    "BottomCenter",
    "BottomRight",
];

pub const MFD_LABEL_PROPERTIES: &[&str] = &["Text", "FontSize", "AutoSize"];

pub const MFD_SPRITE_PROPERTIES: &[&str] = &["FillMethod", "Icon", "FillAmount"];

pub const MFD_GAUGE_PROPERTIES: &[&str] = &[
    "BackgroundColor",
    "FillColor",
    "Text",
    "TextColor",
    "Value",
];

pub const MFD_LINE_INSTRUCTIONS: &[&str] = &["SetThickness", "SetLength"];

pub const MFD_NAVBALL_INSTRUCTIONS: &[&str] = &["TopColor", "BottomColor"];

pub const MFD_MAP_INSTRUCTIONS: &[&str] = &[
    "NorthUp",
    "Zoom",
    "ManualMode",
    "PlanetName",
    "Coordinates",
    "Heading",
];

pub const MFD_EVENTS: &[&str] = &["Drag", "PointerDown", "PointerUp", "PointerClick"];

/// `Roll` -> `roll`, the casing used by `input` and camera `property` attributes.
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
