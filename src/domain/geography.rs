use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use derive_more::derive::{Display, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
	SouthAsia,
	SoutheastAsia,
	EastAsia,
	NorthAmerica,
	Europe,
	MiddleEast,
	Africa,
	Oceania,
	LatinAmerica,
	Global,
}

impl Region {
	pub const fn all() -> &'static [Region] {
		&[
			Region::SouthAsia,
			Region::SoutheastAsia,
			Region::EastAsia,
			Region::NorthAmerica,
			Region::Europe,
			Region::MiddleEast,
			Region::Africa,
			Region::Oceania,
			Region::LatinAmerica,
			Region::Global,
		]
	}

	pub fn code(&self) -> &'static str {
		match self {
			Region::SouthAsia => "south-asia",
			Region::SoutheastAsia => "southeast-asia",
			Region::EastAsia => "east-asia",
			Region::NorthAmerica => "north-america",
			Region::Europe => "europe",
			Region::MiddleEast => "middle-east",
			Region::Africa => "africa",
			Region::Oceania => "oceania",
			Region::LatinAmerica => "latin-america",
			Region::Global => "global",
		}
	}

	/// Countries assigned to this region in table order. Empty for
	/// [`Region::Global`], which only collects unknown countries.
	pub fn countries(&self) -> Vec<Country> {
		countries_in(*self)
	}
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("unknown region code '{code}'")]
pub struct UnknownRegion {
	pub code: String,
}

impl FromStr for Region {
	type Err = UnknownRegion;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Region::all()
			.iter()
			.copied()
			.find(|region| region.code().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| UnknownRegion {
				code: s.to_string(),
			})
	}
}

/// ISO 3166-1 alpha-2 country code, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Country(Cow<'static, str>);

impl Country {
	pub const NEPAL: Country = Country(Cow::Borrowed("NP"));
	pub const INDIA: Country = Country(Cow::Borrowed("IN"));
	pub const PAKISTAN: Country = Country(Cow::Borrowed("PK"));
	pub const BANGLADESH: Country = Country(Cow::Borrowed("BD"));
	pub const SRI_LANKA: Country = Country(Cow::Borrowed("LK"));

	pub const SINGAPORE: Country = Country(Cow::Borrowed("SG"));
	pub const MALAYSIA: Country = Country(Cow::Borrowed("MY"));
	pub const INDONESIA: Country = Country(Cow::Borrowed("ID"));
	pub const THAILAND: Country = Country(Cow::Borrowed("TH"));
	pub const PHILIPPINES: Country = Country(Cow::Borrowed("PH"));
	pub const VIETNAM: Country = Country(Cow::Borrowed("VN"));

	pub const CHINA: Country = Country(Cow::Borrowed("CN"));
	pub const JAPAN: Country = Country(Cow::Borrowed("JP"));
	pub const SOUTH_KOREA: Country = Country(Cow::Borrowed("KR"));

	pub const USA: Country = Country(Cow::Borrowed("US"));
	pub const CANADA: Country = Country(Cow::Borrowed("CA"));
	pub const MEXICO: Country = Country(Cow::Borrowed("MX"));

	pub const UK: Country = Country(Cow::Borrowed("GB"));
	pub const GERMANY: Country = Country(Cow::Borrowed("DE"));
	pub const FRANCE: Country = Country(Cow::Borrowed("FR"));
	pub const SPAIN: Country = Country(Cow::Borrowed("ES"));
	pub const ITALY: Country = Country(Cow::Borrowed("IT"));

	pub const UAE: Country = Country(Cow::Borrowed("AE"));
	pub const SAUDI_ARABIA: Country = Country(Cow::Borrowed("SA"));

	pub const NIGERIA: Country = Country(Cow::Borrowed("NG"));
	pub const SOUTH_AFRICA: Country = Country(Cow::Borrowed("ZA"));
	pub const KENYA: Country = Country(Cow::Borrowed("KE"));

	pub const AUSTRALIA: Country = Country(Cow::Borrowed("AU"));
	pub const NEW_ZEALAND: Country = Country(Cow::Borrowed("NZ"));

	pub const BRAZIL: Country = Country(Cow::Borrowed("BR"));
	pub const ARGENTINA: Country = Country(Cow::Borrowed("AR"));

	pub const GLOBAL: Country = Country(Cow::Borrowed("GLOBAL"));

	pub fn new(code: impl AsRef<str>) -> Self {
		Country(Cow::Owned(code.as_ref().trim().to_ascii_uppercase()))
	}

	pub fn code(&self) -> &str {
		&self.0
	}

	pub fn region(&self) -> Region {
		region_of(self)
	}
}

impl fmt::Display for Country {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Country {
	fn from(code: &str) -> Self {
		Country::new(code)
	}
}

impl From<String> for Country {
	fn from(code: String) -> Self {
		Country::new(code)
	}
}

impl Serialize for Country {
	fn serialize<S: Serializer>(
		&self,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.code())
	}
}

impl<'de> Deserialize<'de> for Country {
	fn deserialize<D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(Country::new)
	}
}

static COUNTRY_REGIONS: [(Country, Region); 31] = [
	(Country::NEPAL, Region::SouthAsia),
	(Country::INDIA, Region::SouthAsia),
	(Country::PAKISTAN, Region::SouthAsia),
	(Country::BANGLADESH, Region::SouthAsia),
	(Country::SRI_LANKA, Region::SouthAsia),
	(Country::SINGAPORE, Region::SoutheastAsia),
	(Country::MALAYSIA, Region::SoutheastAsia),
	(Country::INDONESIA, Region::SoutheastAsia),
	(Country::THAILAND, Region::SoutheastAsia),
	(Country::PHILIPPINES, Region::SoutheastAsia),
	(Country::VIETNAM, Region::SoutheastAsia),
	(Country::CHINA, Region::EastAsia),
	(Country::JAPAN, Region::EastAsia),
	(Country::SOUTH_KOREA, Region::EastAsia),
	(Country::USA, Region::NorthAmerica),
	(Country::CANADA, Region::NorthAmerica),
	(Country::MEXICO, Region::NorthAmerica),
	(Country::UK, Region::Europe),
	(Country::GERMANY, Region::Europe),
	(Country::FRANCE, Region::Europe),
	(Country::SPAIN, Region::Europe),
	(Country::ITALY, Region::Europe),
	(Country::UAE, Region::MiddleEast),
	(Country::SAUDI_ARABIA, Region::MiddleEast),
	(Country::NIGERIA, Region::Africa),
	(Country::SOUTH_AFRICA, Region::Africa),
	(Country::KENYA, Region::Africa),
	(Country::AUSTRALIA, Region::Oceania),
	(Country::NEW_ZEALAND, Region::Oceania),
	(Country::BRAZIL, Region::LatinAmerica),
	(Country::ARGENTINA, Region::LatinAmerica),
];

static REGION_BY_COUNTRY: LazyLock<HashMap<&'static str, Region>> =
	LazyLock::new(|| {
		COUNTRY_REGIONS
			.iter()
			.map(|(country, region)| (country.code(), *region))
			.collect()
	});

/// Region a country belongs to, or [`Region::Global`] when the country is
/// not in the table.
pub fn region_of(country: &Country) -> Region {
	REGION_BY_COUNTRY
		.get(country.code())
		.copied()
		.unwrap_or(Region::Global)
}

pub fn countries_in(region: Region) -> Vec<Country> {
	COUNTRY_REGIONS
		.iter()
		.filter(|(_, r)| *r == region)
		.map(|(country, _)| country.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_region_of_known_countries() {
		let cases = [
			(Country::NEPAL, Region::SouthAsia),
			(Country::INDIA, Region::SouthAsia),
			(Country::USA, Region::NorthAmerica),
			(Country::SINGAPORE, Region::SoutheastAsia),
			(Country::UK, Region::Europe),
		];

		for (country, want) in cases {
			assert_eq!(region_of(&country), want, "region of {country}");
		}
	}

	#[test]
	fn test_region_of_unknown_country_is_global() {
		assert_eq!(region_of(&Country::new("ZZ")), Region::Global);
		assert_eq!(region_of(&Country::GLOBAL), Region::Global);
		assert_eq!(region_of(&Country::new("")), Region::Global);
	}

	#[test]
	fn test_country_codes_are_normalized() {
		assert_eq!(Country::new(" np "), Country::NEPAL);
		assert_eq!(region_of(&Country::from("in")), Region::SouthAsia);
	}

	#[test]
	fn test_countries_in_region() {
		let south_asia = countries_in(Region::SouthAsia);
		assert_eq!(south_asia.len(), 5);
		assert!(south_asia.contains(&Country::NEPAL));
		assert!(!south_asia.contains(&Country::USA));

		assert!(countries_in(Region::Global).is_empty());
	}

	#[test]
	fn test_every_table_country_round_trips_through_its_region() {
		for region in Region::all() {
			for country in region.countries() {
				assert_eq!(country.region(), *region);
			}
		}
	}

	#[test]
	fn test_region_parses_from_code() {
		assert_eq!("south-asia".parse::<Region>(), Ok(Region::SouthAsia));
		assert_eq!("EUROPE".parse::<Region>(), Ok(Region::Europe));
		assert!("atlantis".parse::<Region>().is_err());
		assert_eq!(Region::LatinAmerica.to_string(), "latin-america");
	}
}
