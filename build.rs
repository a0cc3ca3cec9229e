fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/bin_packing.proto");

    // Only the gRPC surface needs generated code (and protoc).
    if std::env::var_os("CARGO_FEATURE_SERVER").is_some() {
        tonic_build::compile_protos("proto/bin_packing.proto")?;
    }

    Ok(())
}
