use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use std::collections::HashSet;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Ident, LitInt, LitStr, Token};

const TWO_BYTE_PREFIX: u16 = 0xFE;

struct OpcodeEntry {
    ident: Ident,
    name: LitStr,
    value: LitInt,
    operand_kind: Ident,
    opcode_type: Ident,
}

impl Parse for OpcodeEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let name = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        input.parse::<Token![,]>()?;
        let operand_kind = input.parse()?;
        input.parse::<Token![,]>()?;
        let opcode_type = input.parse()?;

        Ok(Self {
            ident,
            name,
            value,
            operand_kind,
            opcode_type,
        })
    }
}

struct OpcodeTable {
    entries: Punctuated<OpcodeEntry, Token![;]>,
}

impl Parse for OpcodeTable {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self {
            entries: Punctuated::parse_terminated(input)?,
        })
    }
}

/// Encoded size of an opcode value: one byte, or the `0xFE` prefix plus one byte.
fn encoded_size(value: &LitInt) -> syn::Result<(u16, u8)> {
    let parsed = value.base10_parse::<u16>()?;
    if parsed <= 0xFF {
        return Ok((parsed, 1));
    }
    if parsed >> 8 != TWO_BYTE_PREFIX {
        return Err(syn::Error::new(
            value.span(),
            format!("opcode {parsed:#06x} is neither one byte nor 0xFE-prefixed"),
        ));
    }
    Ok((parsed, 2))
}

/// Validates every entry and generates the constants plus the `DEFINITIONS` slice.
fn expand(table: &OpcodeTable) -> syn::Result<proc_macro2::TokenStream> {
    let mut seen = HashSet::new();
    let mut constants = Vec::new();
    let mut idents = Vec::new();

    for entry in &table.entries {
        if !seen.insert(entry.ident.to_string()) {
            return Err(syn::Error::new(
                entry.ident.span(),
                "duplicate opcode identifier",
            ));
        }
        if entry.name.value().is_empty() {
            return Err(syn::Error::new(
                entry.name.span(),
                "opcode name must not be empty",
            ));
        }

        let (value, size) = encoded_size(&entry.value)?;

        let OpcodeEntry {
            ident,
            name,
            operand_kind,
            opcode_type,
            ..
        } = entry;
        let doc = format!("`{}` ({value:#04x})", name.value());

        constants.push(quote! {
            #[doc = #doc]
            pub const #ident: OpCode = OpCode::new(
                #name,
                #value,
                #size,
                OperandKind::#operand_kind,
                OpCodeType::#opcode_type,
            );
        });
        idents.push(ident.clone());
    }

    let definitions = Ident::new("DEFINITIONS", Span::call_site());
    Ok(quote! {
        #(#constants)*

        /// Every opcode of the instruction set, internal pseudo-opcodes included.
        pub static #definitions: &[OpCode] = &[#(#idents),*];
    })
}

/// Expands a compact opcode listing into `OpCode` constants and a `DEFINITIONS` slice.
///
/// Each entry reads `IDENT: "name" = value, OperandKind, OpCodeType;`. `OpCode`,
/// `OperandKind` and `OpCodeType` must be in scope at the call site.
#[proc_macro]
pub fn opcode_table(input: TokenStream) -> TokenStream {
    let table = parse_macro_input!(input as OpcodeTable);
    match expand(&table) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}
