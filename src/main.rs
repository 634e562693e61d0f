use anyhow::Result;
use aarpack::pack::{self, PackConfig};
use clap::Parser;
use std::path::PathBuf;

/// aarpack - package native libraries as Prefab AARs
///
/// Converts a directory of built native-library packages (CONTROL metadata
/// plus include/ and lib/ trees) into one Android AAR per package+version,
/// merging all architecture slices and recording resolved dependencies in
/// Prefab descriptors.
///
/// Output lands next to the packages directory: finished archives in
/// ./aar, the inspectable staging tree in ./aar-build.
///
/// Examples:
///   aarpack ./packages
///   aarpack --namespace org.example.native --ndk 27 ./packages
#[derive(Parser, Debug)]
#[command(author, version = env!("AARPACK_VERSION"), about)]
struct Cli {
    /// Directory containing one subdirectory per source package
    #[arg(value_name = "PACKAGES_DIR")]
    packages_dir: PathBuf,

    /// Namespace prefix for generated manifest package identifiers
    #[arg(
        long,
        env = "AARPACK_NAMESPACE",
        value_name = "NAMESPACE",
        default_value = "com.android.ndk.thirdparty"
    )]
    namespace: String,

    /// Platform API level recorded for 32-bit ABIs
    #[arg(long = "api-level", value_name = "LEVEL", default_value_t = 16)]
    api_level: u32,

    /// Platform API level recorded for 64-bit ABIs
    #[arg(long = "api-level-64", value_name = "LEVEL", default_value_t = 21)]
    api_level_64: u32,

    /// NDK major version recorded in ABI descriptors
    #[arg(long = "ndk", value_name = "VERSION", default_value_t = 27)]
    ndk_version: u32,

    /// C++ runtime/STL identifier recorded in ABI descriptors
    #[arg(long, value_name = "STL", default_value = "c++_shared")]
    stl: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = PackConfig {
        packages_dir: cli.packages_dir,
        namespace: cli.namespace,
        api_level: cli.api_level,
        api_level_64: cli.api_level_64,
        ndk_version: cli.ndk_version,
        stl: cli.stl,
    };
    pack::run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["aarpack", "./packages"]).unwrap();
        assert_eq!(cli.packages_dir, PathBuf::from("./packages"));
        assert_eq!(cli.namespace, "com.android.ndk.thirdparty");
        assert_eq!(cli.api_level, 16);
        assert_eq!(cli.api_level_64, 21);
        assert_eq!(cli.ndk_version, 27);
        assert_eq!(cli.stl, "c++_shared");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "aarpack",
            "--namespace",
            "org.example",
            "--api-level",
            "21",
            "--api-level-64",
            "24",
            "--ndk",
            "26",
            "--stl",
            "c++_static",
            "pkgs",
        ])
        .unwrap();
        assert_eq!(cli.namespace, "org.example");
        assert_eq!(cli.api_level, 21);
        assert_eq!(cli.api_level_64, 24);
        assert_eq!(cli.ndk_version, 26);
        assert_eq!(cli.stl, "c++_static");
    }

    #[test]
    fn test_cli_requires_packages_dir() {
        assert!(Cli::try_parse_from(["aarpack"]).is_err());
    }
}
