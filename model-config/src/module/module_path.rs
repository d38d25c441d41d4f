use super::*;
use crate::common::*;

/// Dot-separated hierarchical name of a module, e.g. `hourglass_4.front_0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(Vec<ModuleName>);

impl ModulePath {
    pub fn empty() -> Self {
        Self(vec![])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&ModuleName> {
        self.0.last()
    }

    pub fn join<'a>(&self, name: impl Into<Cow<'a, ModuleName>>) -> Self {
        let name = name.into().into_owned();
        self.0.iter().cloned().chain(iter::once(name)).collect()
    }

    /// Append a component given as a string, validating it.
    pub fn join_str(&self, name: impl AsRef<str>) -> Result<Self> {
        let name = ModuleName::new(name.as_ref())?;
        Ok(self.join(name))
    }
}

impl FromStr for ModulePath {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let components: Vec<_> = name.split('.').map(ModuleName::new).try_collect()?;
        Ok(Self(components))
    }
}

impl Serialize for ModulePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModulePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_str(&text).map_err(|err| D::Error::custom(format!("invalid path: {:?}", err)))
    }
}

impl Display for ModulePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = self.0.iter().map(AsRef::<str>::as_ref).join(".");
        Display::fmt(&text, f)
    }
}

impl AsRef<[ModuleName]> for ModulePath {
    fn as_ref(&self) -> &[ModuleName] {
        self.0.as_ref()
    }
}

impl From<ModuleName> for ModulePath {
    fn from(name: ModuleName) -> Self {
        Self(vec![name])
    }
}

impl FromIterator<ModuleName> for ModulePath {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = ModuleName>,
    {
        Self(Vec::from_iter(iter))
    }
}
