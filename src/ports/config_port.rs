//! Configuration access port.

pub trait ConfigPort {
    /// Raw value of `[section] key`, `None` when absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Comma-separated list with blank entries dropped. `None` when the key is absent.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
