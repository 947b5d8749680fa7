//! Shell variable environment.

use indexmap::IndexMap;

/// A variable defined in a shell environment.
#[derive(Clone, Debug)]
pub struct ShellVariable {
    /// The value of the variable.
    pub value: String,
    /// Whether the variable is exported to child processes.
    pub exported: bool,
    /// Whether the variable has been assigned a value. A variable exported
    /// before assignment exists in the store but not in child environments.
    pub assigned: bool,
}

/// The set of variables defined in a shell instance. Variables iterate in
/// the order they were first defined.
#[derive(Clone, Debug, Default)]
pub struct ShellEnvironment {
    vars: IndexMap<String, ShellVariable>,
}

impl ShellEnvironment {
    /// Returns a new environment seeded from the process environment. Entries
    /// whose names are not valid shell variable names are skipped; all seeded
    /// variables are marked exported.
    pub fn from_process_env() -> Self {
        let mut env = Self::default();
        for (name, value) in std::env::vars() {
            if is_valid_variable_name(&name) {
                env.vars.insert(
                    name,
                    ShellVariable {
                        value,
                        exported: true,
                        assigned: true,
                    },
                );
            }
        }

        env
    }

    /// Retrieves the variable with the given name, if defined.
    pub fn get(&self, name: &str) -> Option<&ShellVariable> {
        self.vars.get(name)
    }

    /// Retrieves the value of the variable with the given name, if it has
    /// been assigned one.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .filter(|v| v.assigned)
            .map(|v| v.value.as_str())
    }

    /// Assigns a value to the named variable, preserving its export state and
    /// definition order if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(var) = self.vars.get_mut(&name) {
            var.value = value;
            var.assigned = true;
        } else {
            self.vars.insert(
                name,
                ShellVariable {
                    value,
                    exported: false,
                    assigned: true,
                },
            );
        }
    }

    /// Marks the named variable as exported, creating an unassigned entry if
    /// it does not yet exist.
    pub fn export(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Some(var) = self.vars.get_mut(&name) {
            var.exported = true;
        } else {
            self.vars.insert(
                name,
                ShellVariable {
                    value: String::new(),
                    exported: true,
                    assigned: false,
                },
            );
        }
    }

    /// Removes the named variable. Returns whether a variable was removed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.shift_remove(name).is_some()
    }

    /// Returns an iterator over all variables, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ShellVariable)> {
        self.vars.iter()
    }

    /// Returns the exported, assigned variables in store order, suitable for
    /// constructing a child process's environment.
    pub fn to_environ(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter(|(_, v)| v.exported && v.assigned)
            .map(|(n, v)| (n.clone(), v.value.clone()))
            .collect()
    }
}

/// Returns whether the given string is a valid shell variable name: a letter
/// or underscore followed by letters, digits, or underscores.
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
