use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every cosmic event type the scheduler knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    SolarFlare,
    Comet,
    Supernova,
    Nebula,
    GravitationalWave,
    BlackHole,
    Quasar,
    DarkMatter,
    CosmicStrings,
    Pulsar,
    Wormhole,
    GliderStorm,
    Aurora,
    TimeDilation,
    GalacticWar,
    SpeciesEvolution,
    NuclearWarfare,
    /// Opens the birth gate and seeds invaders. Only spawned by explicit triggers.
    Invasion,
}

impl EventKind {
    pub const COUNT: usize = 18;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::SolarFlare,
        EventKind::Comet,
        EventKind::Supernova,
        EventKind::Nebula,
        EventKind::GravitationalWave,
        EventKind::BlackHole,
        EventKind::Quasar,
        EventKind::DarkMatter,
        EventKind::CosmicStrings,
        EventKind::Pulsar,
        EventKind::Wormhole,
        EventKind::GliderStorm,
        EventKind::Aurora,
        EventKind::TimeDilation,
        EventKind::GalacticWar,
        EventKind::SpeciesEvolution,
        EventKind::NuclearWarfare,
        EventKind::Invasion,
    ];

    /// Dense index into per-kind tables.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EventKind::SolarFlare => "SOLAR_FLARE",
            EventKind::Comet => "COMET",
            EventKind::Supernova => "SUPERNOVA",
            EventKind::Nebula => "NEBULA",
            EventKind::GravitationalWave => "GRAVITATIONAL_WAVE",
            EventKind::BlackHole => "BLACK_HOLE",
            EventKind::Quasar => "QUASAR",
            EventKind::DarkMatter => "DARK_MATTER",
            EventKind::CosmicStrings => "COSMIC_STRINGS",
            EventKind::Pulsar => "PULSAR",
            EventKind::Wormhole => "WORMHOLE",
            EventKind::GliderStorm => "GLIDER_STORM",
            EventKind::Aurora => "AURORA",
            EventKind::TimeDilation => "TIME_DILATION",
            EventKind::GalacticWar => "GALACTIC_WAR",
            EventKind::SpeciesEvolution => "SPECIES_EVOLUTION",
            EventKind::NuclearWarfare => "NUCLEAR_WARFARE",
            EventKind::Invasion => "INVASION",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cosmic event kind: {0}")]
pub struct ParseEventKindError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    /// Accepts `SOLAR_FLARE`, `solar-flare`, `solar_flare` or `SolarFlare`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().replace('_', "").to_ascii_lowercase() == wanted)
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}

/// Direction a comet's glider train travels along its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    East,
    West,
}

/// A sample point on a galactic war front, in fractional grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontPoint {
    pub row: f64,
    pub col: f64,
}

/// Type-specific payload of a cosmic event. One fixed field set per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EventMeta {
    SolarFlare {
        mutation_bonus: f64,
    },
    Comet {
        row: usize,
        heading: Heading,
        mutation_multiplier: f64,
        gliders: u8,
    },
    Supernova {
        row: usize,
        col: usize,
        radius: f64,
        shock_speed: f64,
    },
    Nebula,
    GravitationalWave,
    BlackHole {
        row: usize,
        col: usize,
        growth_rate: f64,
        max_radius: f64,
    },
    Quasar {
        row: usize,
        col: usize,
        start_angle: f64,
        angular_speed: f64,
        beam_width: f64,
        reach: f64,
        boost: f64,
    },
    DarkMatter {
        row: usize,
        col: usize,
        radius: f64,
    },
    CosmicStrings {
        rows: Vec<usize>,
        cols: Vec<usize>,
        boost: f64,
    },
    Pulsar {
        period: u64,
        duty: f64,
        multiplier: f64,
    },
    Wormhole {
        shift_speed: f64,
        spin: i8,
        amplitude: f64,
    },
    GliderStorm {
        band: usize,
        boost: f64,
    },
    Aurora {
        band: usize,
        boost: f64,
    },
    TimeDilation {
        factor: f64,
    },
    GalacticWar {
        front: Vec<FrontPoint>,
        width: f64,
        kill_probability: f64,
        spark_probability: f64,
    },
    SpeciesEvolution {
        dominant: u8,
        adoption: f64,
    },
    NuclearWarfare,
    Invasion {
        clusters: u8,
    },
}

impl EventMeta {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            EventMeta::SolarFlare { .. } => EventKind::SolarFlare,
            EventMeta::Comet { .. } => EventKind::Comet,
            EventMeta::Supernova { .. } => EventKind::Supernova,
            EventMeta::Nebula => EventKind::Nebula,
            EventMeta::GravitationalWave => EventKind::GravitationalWave,
            EventMeta::BlackHole { .. } => EventKind::BlackHole,
            EventMeta::Quasar { .. } => EventKind::Quasar,
            EventMeta::DarkMatter { .. } => EventKind::DarkMatter,
            EventMeta::CosmicStrings { .. } => EventKind::CosmicStrings,
            EventMeta::Pulsar { .. } => EventKind::Pulsar,
            EventMeta::Wormhole { .. } => EventKind::Wormhole,
            EventMeta::GliderStorm { .. } => EventKind::GliderStorm,
            EventMeta::Aurora { .. } => EventKind::Aurora,
            EventMeta::TimeDilation { .. } => EventKind::TimeDilation,
            EventMeta::GalacticWar { .. } => EventKind::GalacticWar,
            EventMeta::SpeciesEvolution { .. } => EventKind::SpeciesEvolution,
            EventMeta::NuclearWarfare => EventKind::NuclearWarfare,
            EventMeta::Invasion { .. } => EventKind::Invasion,
        }
    }
}

/// An active cosmic event: present from `start_tick` through `end_tick` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmicEvent {
    pub id: u64,
    pub start_tick: u64,
    pub end_tick: u64,
    pub meta: EventMeta,
}

impl CosmicEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.meta.kind()
    }

    #[must_use]
    pub fn is_active_at(&self, tick: u64) -> bool {
        self.start_tick <= tick && tick <= self.end_tick
    }

    /// Ticks elapsed since the event started.
    #[must_use]
    pub fn age(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.start_tick)
    }

    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end_tick - self.start_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_names() {
        for kind in EventKind::ALL {
            assert_eq!(kind.name().parse::<EventKind>(), Ok(kind));
            assert_eq!(EventKind::ALL[kind.index()], kind);
        }
        assert_eq!("glider-storm".parse(), Ok(EventKind::GliderStorm));
        assert_eq!("BlackHole".parse(), Ok(EventKind::BlackHole));
        assert!("gamma_burst".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_parse_error_names_the_input() {
        let err = "gamma_burst".parse::<EventKind>().unwrap_err();
        assert_eq!(err, ParseEventKindError("gamma_burst".to_string()));
        assert_eq!(err.to_string(), "unknown cosmic event kind: gamma_burst");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_meta_kind_and_serde_tag() {
        let meta = EventMeta::Pulsar {
            period: 20,
            duty: 0.3,
            multiplier: 8.0,
        };
        assert_eq!(meta.kind(), EventKind::Pulsar);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"kind\":\"Pulsar\""));
    }

    #[test]
    fn test_event_window_is_inclusive() {
        let event = CosmicEvent {
            id: 1,
            start_tick: 10,
            end_tick: 15,
            meta: EventMeta::Nebula,
        };
        assert!(!event.is_active_at(9));
        assert!(event.is_active_at(10));
        assert!(event.is_active_at(15));
        assert!(!event.is_active_at(16));
        assert_eq!(event.duration(), 5);
        assert_eq!(event.age(12), 2);
    }
}
