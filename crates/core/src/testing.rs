//! Test isolation helpers. Only compiled for tests and with `test-support`.

/// Drops every cached configuration, element and full listing held by the
/// global registries.
///
/// Elements handed out before the call stay alive but are no longer the
/// canonical instances; lookups afterwards build fresh ones. Tests calling
/// this should run under `#[serial_test::serial]`.
pub fn clear_enum_cache() {
	crate::registry::reset_all();
}
