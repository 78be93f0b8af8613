use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw component a worker can carry in one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    A,
    B,
}

impl Component {
    /// The component that completes a pair with this one
    pub fn partner(self) -> Component {
        match self {
            Component::A => Component::B,
            Component::B => Component::A,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::A => write!(f, "A"),
            Component::B => write!(f, "B"),
        }
    }
}

/// Content of one belt position
///
/// Serialized as `null`, `"A"`, `"B"` or `"C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Empty,
    ComponentA,
    ComponentB,
    Product,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// The raw component held by this slot, if any
    pub fn component(&self) -> Option<Component> {
        match self {
            Slot::ComponentA => Some(Component::A),
            Slot::ComponentB => Some(Component::B),
            Slot::Empty | Slot::Product => None,
        }
    }

    /// Short marker used on the wire and in logs
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Slot::Empty => None,
            Slot::ComponentA => Some("A"),
            Slot::ComponentB => Some("B"),
            Slot::Product => Some("C"),
        }
    }
}

impl From<Component> for Slot {
    fn from(component: Component) -> Self {
        match component {
            Component::A => Slot::ComponentA,
            Component::B => Slot::ComponentB,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker().unwrap_or("."))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.marker() {
            Some(marker) => serializer.serialize_str(marker),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let marker = Option::<String>::deserialize(deserializer)?;
        match marker.as_deref() {
            None => Ok(Slot::Empty),
            Some("A") => Ok(Slot::ComponentA),
            Some("B") => Ok(Slot::ComponentB),
            Some("C") => Ok(Slot::Product),
            Some(other) => Err(serde::de::Error::custom(format!(
                "unknown slot marker '{}', expected null, \"A\", \"B\" or \"C\"",
                other
            ))),
        }
    }
}

/// A worker's two hands
pub type Hands = [Option<Component>; 2];
