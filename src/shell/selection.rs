use anyhow::{bail, Result};

/// The city checkboxes. Every city starts checked.
#[derive(Debug, Clone)]
pub struct CitySelection {
    entries: Vec<(String, bool)>,
}

impl CitySelection {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: cities.into_iter().map(|city| (city.into(), true)).collect(),
        }
    }

    /// Checked cities in display order.
    pub fn selected(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(city, _)| city.clone())
            .collect()
    }

    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Flip one checkbox, addressed by case-insensitive name or 1-based
    /// position. Returns the city and its new state.
    pub fn toggle(&mut self, key: &str) -> Result<(String, bool)> {
        let key = key.trim();
        let index = match key.parse::<usize>() {
            Ok(n) if (1..=self.entries.len()).contains(&n) => n - 1,
            Ok(n) => bail!("No city number {n} (1-{})", self.entries.len()),
            Err(_) => match self
                .entries
                .iter()
                .position(|(city, _)| city.eq_ignore_ascii_case(key))
            {
                Some(index) => index,
                None => bail!("Unknown city: {key}"),
            },
        };

        let entry = &mut self.entries[index];
        entry.1 = !entry.1;
        Ok((entry.0.clone(), entry.1))
    }

    pub fn set_all(&mut self, checked: bool) {
        for entry in &mut self.entries {
            entry.1 = checked;
        }
    }
}
