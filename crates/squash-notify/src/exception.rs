// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reportable exceptions and the scopes that annotate them.
//!
//! A scope runs a fallible closure; if it fails, the scope's user data or
//! ignored classes are attached to the error on the way out. Scopes nest: the
//! innermost scope's user data wins over an outer scope's for the same key.

use std::fmt;

use serde_json::{Map, Value};
use squash_core::Backtrace;

/// An error as it will be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
	/// Error type name, e.g. `TypeError`.
	pub class_name: String,
	pub message: String,
	pub backtraces: Vec<Backtrace>,
	/// Extra fields merged into the report.
	pub user_data: Map<String, Value>,
	/// Classes a surrounding scope asked not to report.
	pub ignored_classes: Vec<String>,
}

impl Exception {
	pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			class_name: class_name.into(),
			message: message.into(),
			backtraces: Vec::new(),
			user_data: Map::new(),
			ignored_classes: Vec::new(),
		}
	}

	/// Build from any error, using its type name as the class.
	pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
		let type_name = std::any::type_name_of_val(error);
		let class_name = type_name.rsplit("::").next().unwrap_or(type_name);
		Self::new(class_name, error.to_string())
	}

	pub fn with_backtraces(mut self, backtraces: Vec<Backtrace>) -> Self {
		self.backtraces = backtraces;
		self
	}

	/// Set one user data field, replacing any previous value.
	pub fn with_user_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.user_data.insert(key.into(), value.into());
		self
	}

	/// Attach data from an enclosing scope. Keys already present are kept.
	pub fn merge_user_data(&mut self, data: &Map<String, Value>) {
		for (key, value) in data {
			self.user_data
				.entry(key.clone())
				.or_insert_with(|| value.clone());
		}
	}

	/// Attach ignored classes from an enclosing scope.
	pub fn merge_ignored_classes(&mut self, classes: &[String]) {
		for class in classes {
			if !self.ignored_classes.contains(class) {
				self.ignored_classes.push(class.clone());
			}
		}
	}
}

impl fmt::Display for Exception {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.class_name, self.message)
	}
}

impl std::error::Error for Exception {}

/// Run `f`, attaching `data` to its error if it fails.
pub fn add_user_data<T, F>(data: Map<String, Value>, f: F) -> Result<T, Exception>
where
	F: FnOnce() -> Result<T, Exception>,
{
	f().map_err(|mut err| {
		err.merge_user_data(&data);
		err
	})
}

/// Wrap `f` so every failing call gets `data` attached.
pub fn adding_user_data<A, T, F>(
	data: Map<String, Value>,
	f: F,
) -> impl Fn(A) -> Result<T, Exception>
where
	F: Fn(A) -> Result<T, Exception>,
{
	move |arg| add_user_data(data.clone(), || f(arg))
}

/// Run `f`, marking its error as one of the ignored `classes` if it fails.
pub fn ignore_exceptions<T, F, I, S>(classes: I, f: F) -> Result<T, Exception>
where
	F: FnOnce() -> Result<T, Exception>,
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
	f().map_err(|mut err| {
		err.merge_ignored_classes(&classes);
		err
	})
}

/// Wrap `f` so every failing call is marked with the ignored `classes`.
pub fn ignoring_exceptions<A, T, F, I, S>(classes: I, f: F) -> impl Fn(A) -> Result<T, Exception>
where
	F: Fn(A) -> Result<T, Exception>,
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
	move |arg| ignore_exceptions(classes.iter().cloned(), || f(arg))
}
