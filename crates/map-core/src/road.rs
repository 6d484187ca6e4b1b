//! Road classification and traversal restrictions.
//!
//! `RoadType` is a closed enumeration; everything the loader and the viewer
//! need to know about a category (file code, nominal speed, whether it takes
//! part in routing or name lookup, at which zoom it is drawn) is answered by
//! a `match` on the variant rather than a runtime registry.

/// Category of a road edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Pedestrian,
    Track,
    Road,
    Path,
    Tunnel,
    Places,
    Ferry,
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    TertiaryLink,
    /// Background land outline.  Loaded from its own directory, never routed.
    Coastline,
}

impl RoadType {
    /// Every variant, in declaration order.
    pub const ALL: [RoadType; 20] = [
        RoadType::Motorway,
        RoadType::Trunk,
        RoadType::Primary,
        RoadType::Secondary,
        RoadType::Tertiary,
        RoadType::Unclassified,
        RoadType::Residential,
        RoadType::Pedestrian,
        RoadType::Track,
        RoadType::Road,
        RoadType::Path,
        RoadType::Tunnel,
        RoadType::Places,
        RoadType::Ferry,
        RoadType::MotorwayLink,
        RoadType::TrunkLink,
        RoadType::PrimaryLink,
        RoadType::SecondaryLink,
        RoadType::TertiaryLink,
        RoadType::Coastline,
    ];

    /// Variants that have an `edges<code>.bin` file in a dataset directory.
    pub const LOADABLE: [RoadType; 19] = [
        RoadType::Motorway,
        RoadType::Trunk,
        RoadType::Primary,
        RoadType::Secondary,
        RoadType::Tertiary,
        RoadType::Unclassified,
        RoadType::Residential,
        RoadType::Pedestrian,
        RoadType::Track,
        RoadType::Road,
        RoadType::Path,
        RoadType::Tunnel,
        RoadType::Places,
        RoadType::Ferry,
        RoadType::MotorwayLink,
        RoadType::TrunkLink,
        RoadType::PrimaryLink,
        RoadType::SecondaryLink,
        RoadType::TertiaryLink,
    ];

    /// Numeric code used in the binary format.
    pub fn code(self) -> i32 {
        match self {
            RoadType::Coastline     => 0,
            RoadType::Motorway      => 1,
            RoadType::Trunk         => 2,
            RoadType::Primary       => 3,
            RoadType::Secondary     => 4,
            RoadType::Tertiary      => 5,
            RoadType::Unclassified  => 6,
            RoadType::Residential   => 7,
            RoadType::Pedestrian    => 8,
            RoadType::Track         => 9,
            RoadType::Road          => 10,
            RoadType::Path          => 11,
            RoadType::Tunnel        => 12,
            RoadType::Places        => 13,
            RoadType::Ferry         => 14,
            RoadType::MotorwayLink  => 21,
            RoadType::TrunkLink     => 22,
            RoadType::PrimaryLink   => 23,
            RoadType::SecondaryLink => 24,
            RoadType::TertiaryLink  => 25,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: i32) -> Option<RoadType> {
        RoadType::ALL.into_iter().find(|rt| rt.code() == code)
    }

    /// Nominal travel speed in km/h.
    pub fn speed_kmh(self) -> f32 {
        match self {
            RoadType::Motorway | RoadType::MotorwayLink | RoadType::Tunnel => 130.0,
            RoadType::Trunk
            | RoadType::Primary
            | RoadType::Secondary
            | RoadType::Track
            | RoadType::Road
            | RoadType::TrunkLink
            | RoadType::PrimaryLink
            | RoadType::SecondaryLink
            | RoadType::TertiaryLink => 80.0,
            RoadType::Tertiary | RoadType::Unclassified | RoadType::Residential => 50.0,
            RoadType::Pedestrian | RoadType::Path | RoadType::Ferry => 30.0,
            RoadType::Places => 10.0,
            RoadType::Coastline => 0.0,
        }
    }

    /// Minutes needed to cover `length_m` metres at the nominal speed.
    ///
    /// Returns `0.0` for categories without a speed.
    pub fn nominal_drive_time(self, length_m: f32) -> f32 {
        let speed = self.speed_kmh();
        if speed <= 0.0 {
            return 0.0;
        }
        // km/h → m/min
        length_m / (speed * 1000.0 / 60.0)
    }

    /// Name of the per-type edge file inside a dataset directory.
    pub fn edges_file_name(self) -> String {
        format!("edges{}.bin", self.code())
    }

    /// `true` if edges of this type contribute arcs to the routing graph.
    #[inline]
    pub fn is_routable(self) -> bool {
        !matches!(self, RoadType::Pedestrian | RoadType::Coastline)
    }

    /// `true` if edges of this type take part in nearest-edge lookups.
    #[inline]
    pub fn is_selectable(self) -> bool {
        !matches!(self, RoadType::Places | RoadType::Coastline)
    }

    /// Largest zoom factor (map units per pixel) at which this type is drawn.
    pub fn max_zoom_factor(self) -> f64 {
        match self {
            RoadType::Motorway
            | RoadType::MotorwayLink
            | RoadType::Trunk
            | RoadType::TrunkLink
            | RoadType::Primary
            | RoadType::PrimaryLink
            | RoadType::Tunnel
            | RoadType::Ferry
            | RoadType::Coastline => f64::INFINITY,
            RoadType::Secondary | RoadType::SecondaryLink => 250.0,
            RoadType::Tertiary | RoadType::TertiaryLink => 80.0,
            RoadType::Unclassified | RoadType::Road => 40.0,
            RoadType::Residential | RoadType::Track => 20.0,
            RoadType::Pedestrian | RoadType::Path => 8.0,
            RoadType::Places => 5.0,
        }
    }

    /// Visibility at the given zoom factor; smaller factors are closer in.
    #[inline]
    pub fn is_visible(self, zoom_factor: f64) -> bool {
        zoom_factor <= self.max_zoom_factor()
    }

    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            RoadType::Motorway      => "motorway",
            RoadType::Trunk         => "trunk",
            RoadType::Primary       => "primary",
            RoadType::Secondary     => "secondary",
            RoadType::Tertiary      => "tertiary",
            RoadType::Unclassified  => "unclassified",
            RoadType::Residential   => "residential",
            RoadType::Pedestrian    => "pedestrian",
            RoadType::Track         => "track",
            RoadType::Road          => "road",
            RoadType::Path          => "path",
            RoadType::Tunnel        => "tunnel",
            RoadType::Places        => "places",
            RoadType::Ferry         => "ferry",
            RoadType::MotorwayLink  => "motorway_link",
            RoadType::TrunkLink     => "trunk_link",
            RoadType::PrimaryLink   => "primary_link",
            RoadType::SecondaryLink => "secondary_link",
            RoadType::TertiaryLink  => "tertiary_link",
            RoadType::Coastline     => "coastline",
        }
    }
}

impl std::fmt::Display for RoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoadType::ALL
            .into_iter()
            .find(|rt| rt.as_str() == s)
            .ok_or_else(|| format!("unknown road type {s:?}"))
    }
}

// ── OneWay ────────────────────────────────────────────────────────────────────

/// Which direction(s) of an edge's polyline may be driven.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OneWay {
    /// Both directions.
    #[default]
    None,
    /// First polyline point → last polyline point only.
    ForwardOnly,
    /// Last polyline point → first polyline point only.
    BackwardOnly,
}

impl OneWay {
    /// Decode the on-disk code.  Unknown codes return `None` so the caller can
    /// log the anomaly and substitute [`OneWay::None`].
    pub fn from_code(code: i32) -> Option<OneWay> {
        match code {
            -1 => Some(OneWay::BackwardOnly),
            0  => Some(OneWay::None),
            1  => Some(OneWay::ForwardOnly),
            _  => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            OneWay::BackwardOnly => -1,
            OneWay::None         => 0,
            OneWay::ForwardOnly  => 1,
        }
    }

    #[inline]
    pub fn allows_forward(self) -> bool {
        !matches!(self, OneWay::BackwardOnly)
    }

    #[inline]
    pub fn allows_backward(self) -> bool {
        !matches!(self, OneWay::ForwardOnly)
    }
}
