//! Build script for ringpool-runtime
//!
//! Produces the compile-time pool defaults:
//! 1. Start with library defaults
//! 2. If RINGPOOL_CONFIG_RS is set, read the user's constants file
//! 3. User values replace defaults of the same name
//! 4. Write OUT_DIR/ringpool_defaults.rs
//!
//! The user file only needs the values it changes, one per line:
//! `pub const THREAD_NUMS: u32 = 8;`

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

struct Param {
    name: &'static str,
    rust_type: &'static str,
    default_value: &'static str,
}

const PARAMS: &[Param] = &[
    Param {
        name: "THREAD_NUMS",
        rust_type: "u32",
        default_value: "4",
    },
    Param {
        name: "MSG_NODE_MAX",
        rust_type: "u32",
        default_value: "64",
    },
    Param {
        name: "THREAD_STACK_SIZE",
        rust_type: "u32",
        default_value: "256 * 1024",
    },
    Param {
        name: "POOL_NAME",
        rust_type: "&str",
        default_value: "\"ringpool\"",
    },
    Param {
        name: "DRAIN_POLL_MS",
        rust_type: "u64",
        default_value: "10",
    },
];

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("ringpool_defaults.rs");

    let mut values: HashMap<&str, String> = PARAMS
        .iter()
        .map(|p| (p.name, p.default_value.to_string()))
        .collect();

    let user_path = env::var("RINGPOOL_CONFIG_RS").ok();
    if let Some(path) = &user_path {
        println!("cargo:rerun-if-changed={}", path);
        match fs::read_to_string(path) {
            Ok(content) => {
                merge_user_values(&content, &mut values);
                println!("cargo:warning=ringpool using custom defaults: {}", path);
            }
            Err(e) => {
                println!("cargo:warning=cannot read RINGPOOL_CONFIG_RS ({}): {}", path, e);
            }
        }
    }
    println!("cargo:rerun-if-env-changed=RINGPOOL_CONFIG_RS");

    fs::write(&dest, render(&values, user_path.is_some())).expect("failed to write defaults");
}

/// Replace known parameters with values found in `content`.
fn merge_user_values(content: &str, values: &mut HashMap<&str, String>) {
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let Some((name, value)) = parse_const_line(line) else {
            continue;
        };
        match PARAMS.iter().find(|p| p.name == name) {
            Some(p) => {
                values.insert(p.name, value);
            }
            None => println!("cargo:warning=unknown ringpool parameter: {}", name),
        }
    }
}

/// `pub const NAME: TYPE = VALUE;` -> (NAME, VALUE)
fn parse_const_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("pub const ")?.trim();
    let colon = rest.find(':')?;
    let eq = rest.find('=')?;
    if eq < colon {
        return None;
    }
    let semi = rest.rfind(';').unwrap_or(rest.len());
    let name = rest[..colon].trim().to_string();
    let value = rest[eq + 1..semi].trim().to_string();
    Some((name, value))
}

fn render(values: &HashMap<&str, String>, customized: bool) -> String {
    let mut out = String::from("// Generated by build.rs - do not edit\n");
    if customized {
        out.push_str("// Includes overrides from RINGPOOL_CONFIG_RS\n");
    }
    out.push('\n');
    for p in PARAMS {
        let value = values.get(p.name).map(String::as_str).unwrap_or(p.default_value);
        out.push_str(&format!("pub const {}: {} = {};\n", p.name, p.rust_type, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_const_line() {
        assert_eq!(
            parse_const_line("pub const THREAD_NUMS: u32 = 8;"),
            Some(("THREAD_NUMS".into(), "8".into()))
        );
        assert_eq!(
            parse_const_line("pub const POOL_NAME: &str = \"io\";"),
            Some(("POOL_NAME".into(), "\"io\"".into()))
        );
        assert_eq!(parse_const_line("const X: u32 = 1;"), None);
    }

    #[test]
    fn test_merge_user_values() {
        let mut values: HashMap<&str, String> = HashMap::new();
        values.insert("THREAD_NUMS", "4".into());

        merge_user_values("// comment\npub const THREAD_NUMS: u32 = 16;\n", &mut values);
        assert_eq!(values.get("THREAD_NUMS"), Some(&"16".to_string()));
    }
}
