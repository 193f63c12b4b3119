//! Paths into `gx_reflect` used by generated code.

/// Get the access path to the `gx_reflect` crate.
///
/// 1. For crates that depend on `gx_reflect`, `::gx_reflect` is returned.
/// 2. For crates that depend on `gx_core`, `::gx_core::reflect` is returned.
/// 3. Otherwise `::gx_reflect` is returned, which may be incorrect.
pub(crate) fn gx_reflect() -> syn::Path {
    gx_macro_utils::Manifest::shared(|manifest| manifest.crate_path("gx_reflect"))
}
