/// Define a configuration struct with its defaults inline
///
/// ```
/// tickerdesk::config_struct! {
///     pub struct ExampleConfig {
///         timeout_secs: u64 = 10,
///         host: String = "127.0.0.1".to_string(),
///     }
/// }
///
/// let cfg = ExampleConfig::default();
/// assert_eq!(cfg.timeout_secs, 10);
/// ```
///
/// Expands to a struct with public fields, a `Default` impl built from the
/// inline values, and serde support with `#[serde(default)]` so partial TOML
/// sections fill in the rest.
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
