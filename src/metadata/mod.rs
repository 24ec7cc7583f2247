//! Collaborators the decoder consumes: method bodies and symbol resolution.

use std::fmt;

mod cache;
mod table;

pub use cache::CachedResolver;
pub use table::MetadataTable;

/// A 32-bit metadata token: table id in the high byte, row in the low 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    pub const fn table(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn row(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub index: u16,
    pub type_name: String,
    pub pinned: bool,
}

impl LocalVariable {
    pub fn new(index: u16, type_name: impl Into<String>) -> Self {
        Self {
            index,
            type_name: type_name.into(),
            pinned: false,
        }
    }
}

impl fmt::Display for LocalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.index)?;
        if self.pinned {
            f.write_str(" (pinned)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub position: u16,
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(position: u16, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// What an argument slot refers to. Slot 0 of an instance method is the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    This,
    Parameter(Parameter),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::This => f.write_str("this"),
            Argument::Parameter(parameter) => fmt::Display::fmt(parameter, f),
        }
    }
}

/// Generic arguments of the declaring type and of the method itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GenericContext {
    pub type_arguments: Vec<String>,
    pub method_arguments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Type,
    Method,
    Field,
}

/// A resolved type, method or field reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: MemberKind,
    pub name: String,
}

impl Member {
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A standalone signature blob, as referenced by `calli`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Everything the decoder needs to know about one routine.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    pub il: Vec<u8>,
    pub locals: Vec<LocalVariable>,
    pub parameters: Vec<Parameter>,
    /// Instance methods take the receiver as argument slot 0.
    pub has_this: bool,
    pub generic_context: Option<GenericContext>,
}

impl MethodBody {
    pub fn new(il: Vec<u8>) -> Self {
        Self {
            il,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot resolve token {token}: {reason}")]
pub struct ResolveError {
    pub token: Token,
    pub reason: String,
}

impl ResolveError {
    pub fn new(token: Token, reason: impl Into<String>) -> Self {
        Self {
            token,
            reason: reason.into(),
        }
    }
}

/// Supplies raw method bodies. `None` means the routine has nothing to decode.
pub trait MethodBodyProvider {
    type Method: fmt::Display + ?Sized;

    fn method_body(&self, method: &Self::Method) -> Option<MethodBody>;
}

/// Resolves out-of-line tokens into their referents.
pub trait SymbolResolver {
    fn resolve_string(&self, token: Token) -> Result<String, ResolveError>;

    fn resolve_member(
        &self,
        token: Token,
        context: Option<&GenericContext>,
    ) -> Result<Member, ResolveError>;

    fn resolve_signature(&self, token: Token) -> Result<Signature, ResolveError>;
}

impl<R: SymbolResolver + ?Sized> SymbolResolver for &R {
    fn resolve_string(&self, token: Token) -> Result<String, ResolveError> {
        (**self).resolve_string(token)
    }

    fn resolve_member(
        &self,
        token: Token,
        context: Option<&GenericContext>,
    ) -> Result<Member, ResolveError> {
        (**self).resolve_member(token, context)
    }

    fn resolve_signature(&self, token: Token) -> Result<Signature, ResolveError> {
        (**self).resolve_signature(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token(0x0A00_0012);
        assert_eq!(token.table(), 0x0A);
        assert_eq!(token.row(), 0x12);
        assert_eq!(token.to_string(), "0x0a000012");
    }

    #[test]
    fn test_descriptor_rendering() {
        let mut local = LocalVariable::new(1, "System.Int32");
        assert_eq!(local.to_string(), "System.Int32 (1)");
        local.pinned = true;
        assert_eq!(local.to_string(), "System.Int32 (1) (pinned)");

        let parameter = Parameter::new(0, "timeToSleep", "System.TimeSpan");
        assert_eq!(parameter.to_string(), "System.TimeSpan timeToSleep");
        assert_eq!(Argument::This.to_string(), "this");
        assert_eq!(
            Argument::Parameter(parameter).to_string(),
            "System.TimeSpan timeToSleep"
        );
    }

    #[test]
    fn test_signature_rendering() {
        assert_eq!(Signature(vec![0x00, 0x01, 0x08]).to_string(), "(00 01 08)");
        assert_eq!(Signature(Vec::new()).to_string(), "()");
    }
}
