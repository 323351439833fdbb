//! Environment-variable naming convention for harness options.
//!
//! The mapping is part of the contract with every subject process that reads
//! these variables. Changing it is a breaking change and must bump
//! [`ENV_VAR_NAMING_VERSION`].

/// Prefix shared by every harness option variable.
pub const ENV_VAR_NAME_PREFIX: &str = "ELASTIC_APM_PHP_TESTS_";

/// Version of the naming convention.
pub const ENV_VAR_NAMING_VERSION: u32 = 1;

/// Returns the environment variable that carries `option_name`.
///
/// Injective over names accepted by [`is_valid_option_name`], which the
/// registry enforces for every entry.
#[must_use]
pub fn env_var_name_for_option(option_name: &str) -> String {
    format!("{ENV_VAR_NAME_PREFIX}{}", option_name.to_ascii_uppercase())
}

/// Inverse of [`env_var_name_for_option`].
#[must_use]
pub fn option_name_for_env_var(env_var_name: &str) -> Option<String> {
    let suffix = env_var_name.strip_prefix(ENV_VAR_NAME_PREFIX)?;
    let name = suffix.to_ascii_lowercase();
    (is_valid_option_name(&name) && name.to_ascii_uppercase() == suffix).then_some(name)
}

/// Option names are lowercase ASCII words separated by `_`, starting with a letter.
#[must_use]
pub fn is_valid_option_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
