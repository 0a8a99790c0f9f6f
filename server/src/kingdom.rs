//! Fixed kingdom and troop catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four user-selectable factions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Kingdom {
    Fuego,
    Agua,
    Tierra,
    Viento,
}

/// Every troop type a legion can hold. The last four are kingdom-exclusive.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TroopType {
    Soldados,
    Arqueros,
    Caballeros,
    Catapultas,
    Dragones,
    Krakens,
    Golems,
    Grifos,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownName {
    kind: &'static str,
    value: String,
}

impl Kingdom {
    pub const ALL: [Kingdom; 4] = [Kingdom::Fuego, Kingdom::Agua, Kingdom::Tierra, Kingdom::Viento];

    pub fn as_str(self) -> &'static str {
        match self {
            Kingdom::Fuego => "fuego",
            Kingdom::Agua => "agua",
            Kingdom::Tierra => "tierra",
            Kingdom::Viento => "viento",
        }
    }

    /// The one troop type only this kingdom may field.
    pub fn exclusive_troop(self) -> TroopType {
        match self {
            Kingdom::Fuego => TroopType::Dragones,
            Kingdom::Agua => TroopType::Krakens,
            Kingdom::Tierra => TroopType::Golems,
            Kingdom::Viento => TroopType::Grifos,
        }
    }
}

impl TroopType {
    pub const ALL: [TroopType; 8] = [
        TroopType::Soldados,
        TroopType::Arqueros,
        TroopType::Caballeros,
        TroopType::Catapultas,
        TroopType::Dragones,
        TroopType::Krakens,
        TroopType::Golems,
        TroopType::Grifos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TroopType::Soldados => "soldados",
            TroopType::Arqueros => "arqueros",
            TroopType::Caballeros => "caballeros",
            TroopType::Catapultas => "catapultas",
            TroopType::Dragones => "dragones",
            TroopType::Krakens => "krakens",
            TroopType::Golems => "golems",
            TroopType::Grifos => "grifos",
        }
    }

    /// Kingdom owning this troop type, `None` for the common ones.
    pub fn exclusive_to(self) -> Option<Kingdom> {
        Kingdom::ALL
            .into_iter()
            .find(|k| k.exclusive_troop() == self)
    }

    /// Whether a user of `kingdom` may hold this troop type.
    pub fn available_to(self, kingdom: Option<Kingdom>) -> bool {
        match self.exclusive_to() {
            None => true,
            Some(owner) => kingdom == Some(owner),
        }
    }

    pub fn common() -> impl Iterator<Item = TroopType> {
        TroopType::ALL
            .into_iter()
            .filter(|t| t.exclusive_to().is_none())
    }
}

impl fmt::Display for Kingdom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TroopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kingdom {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Kingdom::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownName {
                kind: "kingdom",
                value: s.to_owned(),
            })
    }
}

impl FromStr for TroopType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TroopType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownName {
                kind: "troop type",
                value: s.to_owned(),
            })
    }
}
