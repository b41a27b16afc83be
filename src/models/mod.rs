mod protocols;
mod switch;
mod template;

pub use protocols::{SnmpConfig, SnmpVersion, SshConfig, SshUser, SshVersion, StpConfig, StpMode};
pub use switch::{PortConfig, PortMode, Switch, VlanInterfaceConfig};
pub use template::{PortLayout, SupportMatrix, SwitchTemplate};
