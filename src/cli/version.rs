//! `parley version`: build metadata recorded by `build.rs`.

macro_rules! build_var {
    ($name:literal) => {
        option_env!($name).unwrap_or("unknown")
    };
}

pub fn version_report() -> String {
    let mut lines = vec![format!("parley {}", env!("CARGO_PKG_VERSION"))];
    let fields = [
        ("git describe", build_var!("VERGEN_GIT_DESCRIBE")),
        ("git commit", build_var!("VERGEN_GIT_SHA")),
        ("git branch", build_var!("VERGEN_GIT_BRANCH")),
        ("commit date", build_var!("VERGEN_GIT_COMMIT_TIMESTAMP")),
        ("built", build_var!("VERGEN_BUILD_TIMESTAMP")),
        ("target", build_var!("VERGEN_CARGO_TARGET_TRIPLE")),
        ("profile debug", build_var!("VERGEN_CARGO_DEBUG")),
        ("rustc", build_var!("VERGEN_RUSTC_SEMVER")),
    ];
    for (label, value) in fields {
        lines.push(format!("  {label:<14} {value}"));
    }
    lines.join("\n")
}

pub fn print_version() {
    println!("{}", version_report());
}
