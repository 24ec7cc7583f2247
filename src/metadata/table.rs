use super::{
    GenericContext, Member, MethodBody, MethodBodyProvider, ResolveError, Signature,
    SymbolResolver, Token,
};
use std::collections::HashMap;

/// In-memory metadata: method bodies by name plus token tables.
///
/// Member names may contain generic placeholders, `!N` for the Nth type argument and
/// `!!N` for the Nth method argument, which are substituted from the generic context
/// passed at resolution time.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    methods: HashMap<String, MethodBody>,
    strings: HashMap<Token, String>,
    members: HashMap<Token, Member>,
    signatures: HashMap<Token, Signature>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, name: impl Into<String>, body: MethodBody) -> &mut Self {
        self.methods.insert(name.into(), body);
        self
    }

    pub fn add_string(&mut self, token: Token, value: impl Into<String>) -> &mut Self {
        self.strings.insert(token, value.into());
        self
    }

    pub fn add_member(&mut self, token: Token, member: Member) -> &mut Self {
        self.members.insert(token, member);
        self
    }

    pub fn add_signature(&mut self, token: Token, signature: Signature) -> &mut Self {
        self.signatures.insert(token, signature);
        self
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl MethodBodyProvider for MetadataTable {
    type Method = str;

    fn method_body(&self, method: &str) -> Option<MethodBody> {
        self.methods.get(method).cloned()
    }
}

impl SymbolResolver for MetadataTable {
    fn resolve_string(&self, token: Token) -> Result<String, ResolveError> {
        self.strings
            .get(&token)
            .cloned()
            .ok_or_else(|| ResolveError::new(token, "no such string"))
    }

    fn resolve_member(
        &self,
        token: Token,
        context: Option<&GenericContext>,
    ) -> Result<Member, ResolveError> {
        let member = self
            .members
            .get(&token)
            .ok_or_else(|| ResolveError::new(token, "no such member"))?;
        Ok(Member {
            kind: member.kind,
            name: instantiate(token, &member.name, context)?,
        })
    }

    fn resolve_signature(&self, token: Token) -> Result<Signature, ResolveError> {
        self.signatures
            .get(&token)
            .cloned()
            .ok_or_else(|| ResolveError::new(token, "no such signature"))
    }
}

fn instantiate(
    token: Token,
    name: &str,
    context: Option<&GenericContext>,
) -> Result<String, ResolveError> {
    if !name.contains('!') {
        return Ok(name.to_string());
    }

    let mut instantiated = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(start) = rest.find('!') {
        instantiated.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let (method_level, after) = match after.strip_prefix('!') {
            Some(after) => (true, after),
            None => (false, after),
        };

        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            // A bare `!` is part of the name.
            let marker_end = rest.len() - after.len();
            instantiated.push_str(&rest[start..marker_end]);
            rest = after;
            continue;
        }

        let marker = if method_level { "!!" } else { "!" };
        let position: usize = after[..digits]
            .parse()
            .map_err(|_| ResolveError::new(token, "generic parameter index overflows"))?;
        let arguments = context.map(|context| {
            if method_level {
                &context.method_arguments
            } else {
                &context.type_arguments
            }
        });
        let argument = arguments
            .and_then(|arguments| arguments.get(position))
            .ok_or_else(|| {
                ResolveError::new(token, format!("no generic argument for {marker}{position}"))
            })?;

        instantiated.push_str(argument);
        rest = &after[digits..];
    }
    instantiated.push_str(rest);

    Ok(instantiated)
}
