use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::errors::GatewayError;
use crate::domain::geography::{Country, Region, region_of};

/// Lower values rank first.
pub type Priority = i32;

/// Priority reported for methods that were never registered.
pub const UNREGISTERED_PRIORITY: Priority = 999;

/// How many leading recommendations a regional grant may occupy and still
/// be flagged as recommended.
pub const DEFAULT_REGIONAL_RECOMMENDATION_LIMIT: usize = 5;

/// Breadth of an eligibility grant, declared in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
	Country,
	Region,
	Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
	pub method:      String,
	pub priority:    Priority,
	pub scope:       Scope,
	pub eligible:    bool,
	/// Registry output sets this to `true`; the payment manager replaces it
	/// with whether a live gateway exists for the method.
	pub available:   bool,
	pub recommended: bool,
}

#[derive(Debug, Default)]
struct Eligibility {
	global:     BTreeSet<String>,
	regions:    HashMap<Region, BTreeSet<String>>,
	countries:  HashMap<Country, BTreeSet<String>>,
	priorities: HashMap<String, Priority>,
}

impl Eligibility {
	fn priority_of(&self, method: &str) -> Priority {
		self.priorities
			.get(method)
			.copied()
			.unwrap_or(UNREGISTERED_PRIORITY)
	}

	/// Orders by priority, then by method name.
	fn ranked<'a>(
		&self,
		methods: impl IntoIterator<Item = &'a String>,
	) -> Vec<String> {
		let mut ranked: Vec<String> = methods.into_iter().cloned().collect();
		ranked.sort_by(|a, b| {
			self.priority_of(a)
				.cmp(&self.priority_of(b))
				.then_with(|| a.cmp(b))
		});
		ranked
	}

	fn grants_for(
		&self,
		country: &Country,
	) -> [(Scope, Option<&BTreeSet<String>>); 3] {
		[
			(Scope::Country, self.countries.get(country)),
			(Scope::Region, self.regions.get(&region_of(country))),
			(Scope::Global, Some(&self.global)),
		]
	}
}

/// Which payment methods may be offered where, and in what order.
///
/// Grants are additive across the global, regional and per-country scopes;
/// a method is eligible in a country if any applicable scope grants it.
/// Every method carries a single priority shared by all of its grants, and
/// the latest registration sets it.
#[derive(Debug)]
pub struct GatewayRegistry {
	eligibility:                   RwLock<Eligibility>,
	regional_recommendation_limit: usize,
}

impl Default for GatewayRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl GatewayRegistry {
	pub fn new() -> Self {
		Self {
			eligibility:                   RwLock::new(Eligibility::default()),
			regional_recommendation_limit:
				DEFAULT_REGIONAL_RECOMMENDATION_LIMIT,
		}
	}

	pub fn with_regional_recommendation_limit(mut self, limit: usize) -> Self {
		self.regional_recommendation_limit = limit;
		self
	}

	pub fn regional_recommendation_limit(&self) -> usize {
		self.regional_recommendation_limit
	}

	fn read(&self) -> RwLockReadGuard<'_, Eligibility> {
		self.eligibility
			.read()
			.unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, Eligibility> {
		self.eligibility
			.write()
			.unwrap_or_else(PoisonError::into_inner)
	}

	pub fn register_global(
		&self,
		method: impl Into<String>,
		priority: Priority,
	) {
		let method = method.into();
		debug!("Registering {method} globally with priority {priority}");

		let mut eligibility = self.write();
		eligibility.global.insert(method.clone());
		eligibility.priorities.insert(method, priority);
	}

	pub fn register_for_region(
		&self,
		region: Region,
		method: impl Into<String>,
		priority: Priority,
	) {
		let method = method.into();
		debug!("Registering {method} for {region} with priority {priority}");

		let mut eligibility = self.write();
		eligibility
			.regions
			.entry(region)
			.or_default()
			.insert(method.clone());
		eligibility.priorities.insert(method, priority);
	}

	pub fn register_for_country(
		&self,
		country: Country,
		method: impl Into<String>,
		priority: Priority,
	) {
		let method = method.into();
		debug!("Registering {method} for {country} with priority {priority}");

		let mut eligibility = self.write();
		eligibility
			.countries
			.entry(country)
			.or_default()
			.insert(method.clone());
		eligibility.priorities.insert(method, priority);
	}

	pub fn is_eligible(&self, country: &Country, method: &str) -> bool {
		self.read()
			.grants_for(country)
			.into_iter()
			.filter_map(|(_, methods)| methods)
			.any(|methods| methods.contains(method))
	}

	/// Deduplicated union of every method eligible in `country`, ranked.
	pub fn eligible_methods(&self, country: &Country) -> Vec<String> {
		let eligibility = self.read();
		let union: BTreeSet<&String> = eligibility
			.grants_for(country)
			.into_iter()
			.filter_map(|(_, methods)| methods)
			.flatten()
			.collect();

		eligibility.ranked(union)
	}

	pub fn priority_of(&self, method: &str) -> Priority {
		self.read().priority_of(method)
	}

	/// One entry per scope that grants a method in `country`.
	///
	/// Entries are produced country first, then region, then global, each
	/// scope ranked internally; the list is then stably sorted by priority,
	/// so a method granted by several scopes keeps that scope order. Country
	/// grants are always recommended, regional grants only while fewer than
	/// the regional limit of entries precede them, global grants never.
	pub fn recommendations(&self, country: &Country) -> Vec<Recommendation> {
		let eligibility = self.read();
		let mut recommendations = Vec::new();

		for (scope, methods) in eligibility.grants_for(country) {
			let Some(methods) = methods else {
				continue;
			};

			for method in eligibility.ranked(methods) {
				let recommended = match scope {
					Scope::Country => true,
					Scope::Region => {
						recommendations.len()
							< self.regional_recommendation_limit
					}
					Scope::Global => false,
				};

				recommendations.push(Recommendation {
					priority: eligibility.priority_of(&method),
					method,
					scope,
					eligible: true,
					available: true,
					recommended,
				});
			}
		}

		recommendations.sort_by_key(|recommendation| recommendation.priority);
		recommendations
	}

	pub fn validate_eligibility(
		&self,
		country: &Country,
		method: &str,
	) -> Result<(), GatewayError> {
		if self.is_eligible(country, method) {
			Ok(())
		} else {
			Err(GatewayError::NotEligible {
				country: country.to_string(),
				method:  method.to_string(),
			})
		}
	}
}
