//! Wind presentation: compass label, arrow geometry and strength colouring
//!
//! Everything here is a pure function of a speed (m/s) and a meteorological
//! bearing. Absent values are filtered out before reaching this module.

use serde::Serialize;

/// Angular width of one compass sector
const SECTOR_DEGREES: f64 = 22.5;

/// Arrow stroke width bounds
const STROKE_MIN: f64 = 2.0;
const STROKE_MAX: f64 = 6.0;

/// Arrow head radius bounds and speed scale
const HEAD_MIN: f64 = 3.0;
const HEAD_MAX: f64 = 6.0;
const HEAD_SCALE: f64 = 0.8;

/// Sixteen-point compass, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassPoint {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::Nne,
        CompassPoint::Ne,
        CompassPoint::Ene,
        CompassPoint::E,
        CompassPoint::Ese,
        CompassPoint::Se,
        CompassPoint::Sse,
        CompassPoint::S,
        CompassPoint::Ssw,
        CompassPoint::Sw,
        CompassPoint::Wsw,
        CompassPoint::W,
        CompassPoint::Wnw,
        CompassPoint::Nw,
        CompassPoint::Nnw,
    ];

    /// Nearest point to a bearing.
    ///
    /// Every sector is the half-open arc `(centre - 11.25, centre + 11.25]`,
    /// so an exact boundary bearing always falls to the counter-clockwise
    /// neighbour.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = (bearing / SECTOR_DEGREES - 0.5).ceil() as i64;
        Self::ALL[sector.rem_euclid(16) as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::Nne => "NNE",
            CompassPoint::Ne => "NE",
            CompassPoint::Ene => "ENE",
            CompassPoint::E => "E",
            CompassPoint::Ese => "ESE",
            CompassPoint::Se => "SE",
            CompassPoint::Sse => "SSE",
            CompassPoint::S => "S",
            CompassPoint::Ssw => "SSW",
            CompassPoint::Sw => "SW",
            CompassPoint::Wsw => "WSW",
            CompassPoint::W => "W",
            CompassPoint::Wnw => "WNW",
            CompassPoint::Nw => "NW",
            CompassPoint::Nnw => "NNW",
        }
    }

    /// Japanese label as shown on the compass face
    pub fn localized_label(self) -> &'static str {
        match self {
            CompassPoint::N => "北",
            CompassPoint::Nne => "北北東",
            CompassPoint::Ne => "北東",
            CompassPoint::Ene => "東北東",
            CompassPoint::E => "東",
            CompassPoint::Ese => "東南東",
            CompassPoint::Se => "南東",
            CompassPoint::Sse => "南南東",
            CompassPoint::S => "南",
            CompassPoint::Ssw => "南南西",
            CompassPoint::Sw => "南西",
            CompassPoint::Wsw => "西南西",
            CompassPoint::W => "西",
            CompassPoint::Wnw => "西北西",
            CompassPoint::Nw => "北西",
            CompassPoint::Nnw => "北北西",
        }
    }
}

/// Speed bucket, lower bound inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStrength {
    /// [0, 2) m/s
    Light,
    /// [2, 5) m/s
    Moderate,
    /// [5, 8) m/s
    Strong,
    /// 8 m/s and above
    Severe,
}

impl WindStrength {
    pub fn classify(speed: f64) -> Self {
        if speed < 2.0 {
            WindStrength::Light
        } else if speed < 5.0 {
            WindStrength::Moderate
        } else if speed < 8.0 {
            WindStrength::Strong
        } else {
            WindStrength::Severe
        }
    }

    pub fn color(self) -> ColorToken {
        match self {
            WindStrength::Light => ColorToken::Green,
            WindStrength::Moderate => ColorToken::Yellow,
            WindStrength::Strong => ColorToken::Orange,
            WindStrength::Severe => ColorToken::Red,
        }
    }

    pub fn localized_label(self) -> &'static str {
        match self {
            WindStrength::Light => "微風",
            WindStrength::Moderate => "弱風",
            WindStrength::Strong => "中風",
            WindStrength::Severe => "強風",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Green,
    Yellow,
    Orange,
    Red,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Green => "#22c55e",
            ColorToken::Yellow => "#eab308",
            ColorToken::Orange => "#f97316",
            ColorToken::Red => "#dc2626",
        }
    }
}

/// Everything the compass needs to draw one reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindPresentation {
    pub direction: CompassPoint,
    pub direction_label: &'static str,
    pub localized_direction_label: &'static str,
    pub rotation_degrees: f64,
    pub arrow_stroke_width: f64,
    pub arrow_head_radius: f64,
    pub color_token: ColorToken,
    pub color_hex: &'static str,
    pub strength_class: WindStrength,
    pub localized_strength_label: &'static str,
}

/// Arrow rotation: the bearing names the source, the arrow points downwind.
pub fn rotation_degrees(bearing: f64) -> f64 {
    bearing - 180.0
}

pub fn arrow_stroke_width(speed: f64) -> f64 {
    speed.clamp(STROKE_MIN, STROKE_MAX)
}

pub fn arrow_head_radius(speed: f64) -> f64 {
    (speed * HEAD_SCALE).clamp(HEAD_MIN, HEAD_MAX)
}

pub fn present(speed: f64, bearing: f64) -> WindPresentation {
    let direction = CompassPoint::from_bearing(bearing);
    let strength = WindStrength::classify(speed);
    let color = strength.color();
    WindPresentation {
        direction,
        direction_label: direction.label(),
        localized_direction_label: direction.localized_label(),
        rotation_degrees: rotation_degrees(bearing),
        arrow_stroke_width: arrow_stroke_width(speed),
        arrow_head_radius: arrow_head_radius(speed),
        color_token: color,
        color_hex: color.hex(),
        strength_class: strength,
        localized_strength_label: strength.localized_label(),
    }
}
