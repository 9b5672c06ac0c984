//! Binary entrypoint for the browser-hosted upload runtime.

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
fn main() {
    parcel_site::mount();
}

#[cfg(not(all(target_arch = "wasm32", feature = "csr")))]
fn main() {
    eprintln!(
        "This binary is intended for the browser/WASM workflow. Build `parcel_site_app` for wasm32 with the `csr` feature."
    );
}
