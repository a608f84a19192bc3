/// Builds the gRPC client and server code for the `kitchen.proto` definition
/// using `tonic-prost-build`.
///
/// The generated module is included from `src/common.rs` via:
///
/// ```rust
/// pub mod proto {
///     tonic::include_proto!("com.eginwong.kitchensim");
/// }
/// ```
///
/// The server half is generated as well so tests can stand up an in-process
/// kitchen.
///
/// # Panics
///
/// Panics if code generation fails (e.g. `protoc` is not installed).
fn main() {
    println!("cargo:rerun-if-changed=proto/kitchen.proto");

    let config = tonic_prost_build::Config::new();

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/kitchen.proto"], &["proto"])
        .unwrap();
}
