//! # Property Lookup
//!
//! Case-insensitive lookup over flat name/value lists — the wire envelope's
//! property lists and flattened request parameters share the same shape, so
//! the helpers are generic over a [`NamedValue`] accessor pair.
//!
//! ## Name Discipline
//!
//! Every property-name comparison in the workspace goes through this
//! module: ASCII case-insensitive, first match wins, absence is a normal
//! outcome (never an error). Reserved-name membership uses the same
//! discipline via [`is_reserved`]. Stored names are never case-folded.

/// A named scalar value in a flat list.
pub trait NamedValue {
    /// The property name as it appeared on the wire.
    fn name(&self) -> &str;
    /// The property value.
    fn value(&self) -> &str;
}

impl NamedValue for (String, String) {
    fn name(&self) -> &str {
        &self.0
    }

    fn value(&self) -> &str {
        &self.1
    }
}

impl<T: NamedValue> NamedValue for &T {
    fn name(&self) -> &str {
        (*self).name()
    }

    fn value(&self) -> &str {
        (*self).value()
    }
}

/// Find the first property whose name matches `name` case-insensitively.
///
/// Absent properties are an expected case (optional fields); this never
/// fails.
pub fn property_by_name<'a, P: NamedValue>(properties: &'a [P], name: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|p| p.name().eq_ignore_ascii_case(name))
        .map(|p| p.value())
}

/// Like [`property_by_name`], falling back to `default` when absent.
pub fn property_by_name_or<'a, P: NamedValue>(
    properties: &'a [P],
    name: &str,
    default: &'a str,
) -> &'a str {
    property_by_name(properties, name).unwrap_or(default)
}

/// Whether `name` belongs to a reserved-name set, case-insensitively.
pub fn is_reserved(name: &str, reserved: &[&str]) -> bool {
    reserved.iter().any(|r| r.eq_ignore_ascii_case(name))
}
