use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::flip::css::{StyleMap, transition_value};
use crate::foundation::error::{FlipError, FlipResult};

/// Lazily evaluated style map.
pub type StyleThunk = Rc<dyn Fn() -> StyleMap>;

/// Lazily evaluated transition configuration.
pub type ConfigThunk = Rc<dyn Fn() -> TransitionConfig>;

/// Style payload of a transition: a literal map or a function producing one when the hook
/// fires.
#[derive(Clone)]
pub enum Css {
    /// Literal declarations.
    Map(StyleMap),
    /// Evaluated once per firing.
    Thunk(StyleThunk),
}

impl Css {
    /// Deferred payload.
    pub fn thunk(f: impl Fn() -> StyleMap + 'static) -> Self {
        Self::Thunk(Rc::new(f))
    }

    /// Produce the declarations, calling the thunk if there is one.
    pub fn resolve(&self) -> StyleMap {
        match self {
            Self::Map(map) => map.clone(),
            Self::Thunk(f) => f(),
        }
    }
}

impl From<StyleMap> for Css {
    fn from(map: StyleMap) -> Self {
        Self::Map(map)
    }
}

impl fmt::Debug for Css {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// Options of one transition binding.
#[derive(Clone, Debug)]
pub struct TransitionConfig {
    /// Class-name prefix; enables the `<name>-enter` / `<name>-exit` classes.
    pub name: Option<String>,
    /// Transition duration.
    pub time: Duration,
    /// Wait before the transition starts.
    pub delay: Duration,
    /// Wait after mount before the first stable position capture.
    pub ready: Duration,
    /// CSS easing function.
    pub easing: String,
    /// This binding performs the final removal of an exiting node.
    pub last: bool,
    /// Never remove the node, even when `last` is set.
    pub keep: bool,
    /// Style applied on enter (as start state) or exit (as end state).
    pub css: Option<Css>,
}

/// Default transition duration.
pub const DEFAULT_TIME: Duration = Duration::from_millis(300);
/// Default easing.
pub const DEFAULT_EASING: &str = "linear";

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            name: None,
            time: DEFAULT_TIME,
            delay: Duration::ZERO,
            ready: Duration::ZERO,
            easing: DEFAULT_EASING.to_owned(),
            last: true,
            keep: false,
            css: None,
        }
    }
}

impl TransitionConfig {
    /// Defaults: 300ms, linear, no delay, removes on exit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON (times in integer milliseconds).
    pub fn from_json(s: &str) -> FlipResult<Self> {
        let def: TransitionDef = serde_json::from_str(s)?;
        def.validate()?;
        Ok(def.into())
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ready(mut self, ready: Duration) -> Self {
        self.ready = ready;
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }

    pub fn last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    /// Literal style payload.
    pub fn css<K, V>(mut self, decls: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = decls
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<StyleMap>();
        self.css = Some(Css::Map(map));
        self
    }

    /// Deferred style payload, evaluated when the hook fires.
    pub fn css_with(mut self, f: impl Fn() -> StyleMap + 'static) -> Self {
        self.css = Some(Css::thunk(f));
        self
    }

    /// Resolved style payload (empty when unset).
    pub fn resolve_css(&self) -> StyleMap {
        self.css.as_ref().map(Css::resolve).unwrap_or_default()
    }

    /// `all <easing> <time>ms`.
    pub fn transition(&self) -> String {
        transition_value(&self.easing, self.time)
    }

    /// `<name>-enter`, when a name is set.
    pub fn enter_class(&self) -> Option<String> {
        self.name.as_ref().map(|n| format!("{n}-enter"))
    }

    /// `<name>-exit`, when a name is set.
    pub fn exit_class(&self) -> Option<String> {
        self.name.as_ref().map(|n| format!("{n}-exit"))
    }

    /// Whether an exit run ends by removing the node.
    pub fn removes(&self) -> bool {
        self.last && !self.keep
    }
}

/// Configuration as supplied by a caller: ready values or a function producing them when the
/// hook fires.
#[derive(Clone)]
pub enum ConfigSource {
    /// Fixed options.
    Literal(Rc<TransitionConfig>),
    /// Evaluated once per firing.
    Thunk(ConfigThunk),
}

impl ConfigSource {
    /// Deferred configuration.
    pub fn thunk(f: impl Fn() -> TransitionConfig + 'static) -> Self {
        Self::Thunk(Rc::new(f))
    }

    /// Options for one firing.
    pub fn resolve(&self) -> Rc<TransitionConfig> {
        match self {
            Self::Literal(cfg) => Rc::clone(cfg),
            Self::Thunk(f) => Rc::new(f()),
        }
    }
}

impl From<TransitionConfig> for ConfigSource {
    fn from(cfg: TransitionConfig) -> Self {
        Self::Literal(Rc::new(cfg))
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        TransitionConfig::default().into()
    }
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(cfg) => f.debug_tuple("Literal").field(cfg).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// Serialized form of [`TransitionConfig`]. Durations are integer milliseconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionDef {
    pub name: Option<String>,
    pub time: u64,
    pub delay: u64,
    pub ready: u64,
    pub easing: String,
    pub last: bool,
    pub keep: bool,
    pub css: Option<StyleMap>,
}

impl Default for TransitionDef {
    fn default() -> Self {
        Self {
            name: None,
            time: DEFAULT_TIME.as_millis() as u64,
            delay: 0,
            ready: 0,
            easing: DEFAULT_EASING.to_owned(),
            last: true,
            keep: false,
            css: None,
        }
    }
}

impl TransitionDef {
    /// Reject values that cannot be written into a style declaration.
    pub fn validate(&self) -> FlipResult<()> {
        if self.easing.trim().is_empty() {
            return Err(FlipError::config("easing must be non-empty"));
        }
        if self.easing.contains(';') {
            return Err(FlipError::config(format!(
                "easing '{}' must not contain ';'",
                self.easing
            )));
        }
        if let Some(name) = &self.name
            && (name.is_empty() || name.chars().any(char::is_whitespace))
        {
            return Err(FlipError::config(format!("invalid class prefix '{name}'")));
        }
        Ok(())
    }
}

impl From<TransitionDef> for TransitionConfig {
    fn from(def: TransitionDef) -> Self {
        Self {
            name: def.name,
            time: Duration::from_millis(def.time),
            delay: Duration::from_millis(def.delay),
            ready: Duration::from_millis(def.ready),
            easing: def.easing,
            last: def.last,
            keep: def.keep,
            css: def.css.map(Css::Map),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/config.rs"]
mod tests;
