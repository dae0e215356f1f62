use crate::types::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canadian provinces and territories, as used to filter the station inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Province {
    Alberta,
    BritishColumbia,
    Manitoba,
    NewBrunswick,
    Newfoundland,
    NorthwestTerritories,
    NovaScotia,
    Nunavut,
    Ontario,
    PrinceEdwardIsland,
    Quebec,
    Saskatchewan,
    Yukon,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Province::Alberta,
        Province::BritishColumbia,
        Province::Manitoba,
        Province::NewBrunswick,
        Province::Newfoundland,
        Province::NorthwestTerritories,
        Province::NovaScotia,
        Province::Nunavut,
        Province::Ontario,
        Province::PrinceEdwardIsland,
        Province::Quebec,
        Province::Saskatchewan,
        Province::Yukon,
    ];

    /// The two letter postal code, e.g. `"ON"`.
    pub fn code(&self) -> &'static str {
        match self {
            Province::Alberta => "AB",
            Province::BritishColumbia => "BC",
            Province::Manitoba => "MB",
            Province::NewBrunswick => "NB",
            Province::Newfoundland => "NL",
            Province::NorthwestTerritories => "NT",
            Province::NovaScotia => "NS",
            Province::Nunavut => "NU",
            Province::Ontario => "ON",
            Province::PrinceEdwardIsland => "PE",
            Province::Quebec => "QC",
            Province::Saskatchewan => "SK",
            Province::Yukon => "YT",
        }
    }

    /// The name written in the `Province` column of the station inventory.
    pub fn inventory_name(&self) -> &'static str {
        match self {
            Province::Alberta => "ALBERTA",
            Province::BritishColumbia => "BRITISH COLUMBIA",
            Province::Manitoba => "MANITOBA",
            Province::NewBrunswick => "NEW BRUNSWICK",
            Province::Newfoundland => "NEWFOUNDLAND",
            Province::NorthwestTerritories => "NORTHWEST TERRITORIES",
            Province::NovaScotia => "NOVA SCOTIA",
            Province::Nunavut => "NUNAVUT",
            Province::Ontario => "ONTARIO",
            Province::PrinceEdwardIsland => "PRINCE EDWARD ISLAND",
            Province::Quebec => "QUEBEC",
            Province::Saskatchewan => "SASKATCHEWAN",
            Province::Yukon => "YUKON TERRITORY",
        }
    }

    /// Maps an inventory `Province` value back to a province.
    ///
    /// Besides the canonical names, a few spellings seen in older inventories
    /// ("YUKON", "NEWFOUNDLAND AND LABRADOR") and bare codes are accepted.
    pub fn from_inventory_name(name: &str) -> Option<Province> {
        let name = name.trim().to_uppercase();
        match name.as_str() {
            "YUKON" => return Some(Province::Yukon),
            "NEWFOUNDLAND AND LABRADOR" => return Some(Province::Newfoundland),
            _ => {}
        }
        Province::ALL
            .into_iter()
            .find(|p| p.inventory_name() == name || p.code() == name)
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parses a two letter province code, case-insensitively.
///
/// # Examples
///
/// ```
/// use ec3::Province;
///
/// assert_eq!("qc".parse::<Province>().unwrap(), Province::Quebec);
/// assert!("ZZ".parse::<Province>().is_err());
/// ```
impl FromStr for Province {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Province::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| ConfigError::InvalidProvince(s.to_string()))
    }
}

/// Parses a list of province codes, failing on the first unknown code.
pub fn parse_provinces<I, S>(codes: I) -> Result<Vec<Province>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes.into_iter().map(|c| c.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_inventory_names() {
        for province in Province::ALL {
            assert_eq!(province.code().parse::<Province>().unwrap(), province);
            assert_eq!(
                Province::from_inventory_name(province.inventory_name()),
                Some(province)
            );
        }
    }

    #[test]
    fn test_parse_provinces() {
        let parsed = parse_provinces(["on", "QC"]).unwrap();
        assert_eq!(parsed, vec![Province::Ontario, Province::Quebec]);

        let err = parse_provinces(["ON", "ZZ"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProvince(code) if code == "ZZ"));
    }

    #[test]
    fn test_inventory_name_variants() {
        assert_eq!(Province::from_inventory_name("Yukon"), Some(Province::Yukon));
        assert_eq!(
            Province::from_inventory_name("NEWFOUNDLAND AND LABRADOR"),
            Some(Province::Newfoundland)
        );
        assert_eq!(Province::from_inventory_name("ATLANTIS"), None);
    }
}
