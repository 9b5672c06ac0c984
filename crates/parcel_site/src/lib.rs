//! Page entry layer: installs the drop coordinator and mounts upload surfaces into server-rendered
//! `<parcel-upload-form>` elements, including ones htmx swaps in later.

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
mod web_app;

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub use web_app::mount;
