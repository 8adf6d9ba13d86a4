use time::format_description;
use time::OffsetDateTime;

/// Export `var` to the crate, formatted from `now` unless already set in the
/// build environment.
fn stamp(var: &str, format: &str, now: OffsetDateTime) {
    println!("cargo:rerun-if-env-changed={var}");
    let value = std::env::var(var).unwrap_or_else(|_| {
        format_description::parse(format)
            .ok()
            .and_then(|desc| now.format(&desc).ok())
            .unwrap_or_else(|| "unknown".to_string())
    });
    println!("cargo:rustc-env={var}={value}");
}

fn main() {
    let now = OffsetDateTime::now_utc();
    stamp("TEXTURE_IMPORTER_BUILD_DATE", "[year]-[month]-[day]", now);
    stamp("TEXTURE_IMPORTER_BUILD_TIME", "[hour]:[minute] UTC", now);
}
