// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered, queryable collection of mappings.
//!
//! Mappings are grouped by route. Within a route they are kept sorted by
//! `(compiled_line, compiled_column)` with a stable order for equal keys, so
//! iterating the groups in route order yields the whole index sorted by
//! `(route, compiled_line, compiled_column)`.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mapping::Mapping;

/// In-memory source map covering any number of compiled routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapIndex {
	routes: BTreeMap<String, Vec<Mapping>>,
	len: usize,
}

impl SourceMapIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a mapping. Equal keys keep insertion order.
	pub fn push(&mut self, mapping: Mapping) {
		let entries = self.routes.entry(mapping.route.clone()).or_default();
		let key = mapping.compiled_position();
		let at = entries.partition_point(|m| m.compiled_position() <= key);
		entries.insert(at, mapping);
		self.len += 1;
	}

	/// Combine another index into this one.
	///
	/// Entries of `other` sort after existing entries with the same key.
	pub fn combine_with(&mut self, other: SourceMapIndex) {
		self.extend(other.into_mappings());
	}

	/// Combine two indexes, `self` first.
	pub fn combine(mut self, other: SourceMapIndex) -> Self {
		self.combine_with(other);
		self
	}

	/// Combine any number of indexes, in order.
	pub fn combine_all(maps: impl IntoIterator<Item = SourceMapIndex>) -> Self {
		maps.into_iter().fold(Self::new(), Self::combine)
	}

	/// Find the mapping for a compiled position.
	///
	/// Returns the mapping on exactly `route` and `line` with the greatest
	/// `compiled_column <= column`. When several mappings share that key the
	/// one appended last wins.
	pub fn resolve(&self, route: &str, line: u32, column: u32) -> Option<&Mapping> {
		let entries = self.routes.get(route)?;
		let end = entries.partition_point(|m| m.compiled_position() <= (line, column));
		entries[..end]
			.last()
			.filter(|candidate| candidate.compiled_line == line)
	}

	/// All mappings, sorted by `(route, compiled_line, compiled_column)`.
	pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
		self.routes.values().flatten()
	}

	/// Mappings of a single route, sorted by compiled position.
	pub fn route_mappings(&self, route: &str) -> &[Mapping] {
		self.routes.get(route).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn routes(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(String::as_str)
	}

	pub fn into_mappings(self) -> Vec<Mapping> {
		self.routes.into_values().flatten().collect()
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl Extend<Mapping> for SourceMapIndex {
	fn extend<I: IntoIterator<Item = Mapping>>(&mut self, iter: I) {
		let mut touched = BTreeSet::new();
		for mapping in iter {
			if !touched.contains(&mapping.route) {
				touched.insert(mapping.route.clone());
			}
			self.routes.entry(mapping.route.clone()).or_default().push(mapping);
			self.len += 1;
		}
		for route in touched {
			if let Some(entries) = self.routes.get_mut(&route) {
				// stable: ties keep insertion order
				entries.sort_by_key(Mapping::compiled_position);
			}
		}
	}
}

impl FromIterator<Mapping> for SourceMapIndex {
	fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
		let mut index = Self::new();
		index.extend(iter);
		index
	}
}

impl Add for SourceMapIndex {
	type Output = SourceMapIndex;

	fn add(self, other: SourceMapIndex) -> SourceMapIndex {
		self.combine(other)
	}
}

impl Serialize for SourceMapIndex {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.mappings())
	}
}

impl<'de> Deserialize<'de> for SourceMapIndex {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let mappings = Vec::<Mapping>::deserialize(deserializer)?;
		Ok(mappings.into_iter().collect())
	}
}
