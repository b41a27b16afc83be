use serde::{Deserialize, Serialize};

/// PortLayout describes the physical port arrangement of a switch model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortLayout {
    pub rows: u32,
    pub cols: u32,
    pub total_ports: u32,
}

impl Default for PortLayout {
    fn default() -> Self {
        // 24-port 1U layout used when a model ships no template
        Self {
            rows: 2,
            cols: 12,
            total_ports: 24,
        }
    }
}

/// SupportMatrix lists the optional capabilities of a switch model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportMatrix {
    #[serde(default)]
    pub poe: bool,
}

/// SwitchTemplate is the per-model template loaded from the repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchTemplate {
    #[serde(default)]
    pub port_layout: Option<PortLayout>,
    #[serde(default)]
    pub supports: SupportMatrix,
    /// Commands appended verbatim after the generated blocks; the literal
    /// token `{hostname}` is substituted at render time.
    #[serde(default)]
    pub default_commands: Vec<String>,
}

impl SwitchTemplate {
    /// Port layout from the template, or the default 24-port layout
    pub fn layout(&self) -> PortLayout {
        self.port_layout.clone().unwrap_or_default()
    }
}
