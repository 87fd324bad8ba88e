#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Load,
    Reload,
    Get,
    Categories,
    Validate,
    Normalize,
    Save,
    EnableFs,
    AddEntry,
    RemoveEntry,
    EditEntry,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "catalog.load" => Command::Load,
            "catalog.reload" => Command::Reload,
            "catalog.get" => Command::Get,
            "catalog.categories" => Command::Categories,
            "catalog.validate" => Command::Validate,
            "catalog.normalize" => Command::Normalize,
            "catalog.save" => Command::Save,
            "fs.enable" => Command::EnableFs,
            "entry.add" => Command::AddEntry,
            "entry.remove" => Command::RemoveEntry,
            "entry.edit" => Command::EditEntry,
            _ => Command::Unknown,
        }
    }
}
