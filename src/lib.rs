pub mod cil;
pub mod metadata;

use cil::{DecodeError, InstructionList, MethodBodyReader};
use log::debug;
use metadata::{MethodBodyProvider, SymbolResolver};
use rayon::prelude::*;

/// Disassembles one method: fetches its body from `provider` and decodes it,
/// resolving tokens through `resolver`.
pub fn disassemble<P, R>(
    provider: &P,
    resolver: &R,
    method: &P::Method,
) -> Result<InstructionList, DecodeError>
where
    P: MethodBodyProvider + ?Sized,
    R: SymbolResolver + ?Sized,
{
    let body = provider
        .method_body(method)
        .ok_or_else(|| DecodeError::NoBody(method.to_string()))?;
    debug!("disassembling {method} ({} bytes)", body.il.len());

    let instructions = MethodBodyReader::new(&body, resolver).read_instructions()?;
    debug!("decoded {} instructions from {method}", instructions.len());
    Ok(instructions)
}

/// Disassembles several methods in parallel. Results keep the input order, and a
/// failure only affects its own method.
pub fn disassemble_all<'m, P, R>(
    provider: &P,
    resolver: &R,
    methods: &[&'m P::Method],
) -> Vec<(&'m P::Method, Result<InstructionList, DecodeError>)>
where
    P: MethodBodyProvider + Sync + ?Sized,
    P::Method: Sync,
    R: SymbolResolver + Sync + ?Sized,
{
    methods
        .par_iter()
        .map(|&method| (method, disassemble(provider, resolver, method)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cil::{opcodes, IlEncoder};
    use crate::metadata::{
        CachedResolver, Member, MemberKind, MetadataTable, MethodBody, Parameter, Token,
    };
    use std::num::NonZeroUsize;

    fn metadata() -> MetadataTable {
        let mut table = MetadataTable::new();
        table
            .add_method(
                "Program::TestSleep",
                MethodBody {
                    il: IlEncoder::new()
                        .op(opcodes::NOP)
                        .op(opcodes::LDARG_0)
                        .op(opcodes::CALL)
                        .token(Token(0x0A00_000C))
                        .op(opcodes::NOP)
                        .op(opcodes::RET)
                        .finish(),
                    parameters: vec![Parameter::new(0, "timeToSleep", "System.TimeSpan")],
                    ..Default::default()
                },
            )
            .add_method(
                "Program::Broken",
                MethodBody::new(vec![0x00, 0x28, 0x0C, 0x00]),
            )
            .add_method(
                "Program::Unresolvable",
                MethodBody::new(IlEncoder::new().op(opcodes::LDSTR).i32(0x7000_0001).finish()),
            )
            .add_member(
                Token(0x0A00_000C),
                Member::new(
                    MemberKind::Method,
                    "System.Threading.Thread::Sleep(System.TimeSpan)",
                ),
            );
        table
    }

    #[test]
    fn test_disassemble_method() {
        let table = metadata();
        let instructions = disassemble(&table, &table, "Program::TestSleep").unwrap();
        assert_eq!(
            instructions.to_string(),
            "IL_0000: nop\n\
             IL_0001: ldarg.0\n\
             IL_0002: call System.Threading.Thread::Sleep(System.TimeSpan)\n\
             IL_0007: nop\n\
             IL_0008: ret\n"
        );
    }

    #[test]
    fn test_missing_method_has_no_body() {
        let table = metadata();
        match disassemble(&table, &table, "Program::Main") {
            Err(DecodeError::NoBody(name)) => assert_eq!(name, "Program::Main"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_disassemble_all_reports_per_method() {
        let table = metadata();
        let resolver = CachedResolver::new(table.clone(), NonZeroUsize::new(16).unwrap());
        let methods = [
            "Program::TestSleep",
            "Program::Broken",
            "Program::Unresolvable",
            "Program::Missing",
        ];

        let results = disassemble_all(&table, &resolver, &methods);
        assert_eq!(results.len(), 4);
        let names: Vec<&str> = results.iter().map(|(method, _)| *method).collect();
        assert_eq!(names, methods);

        assert_eq!(results[0].1.as_ref().unwrap().len(), 5);
        assert!(matches!(results[1].1, Err(DecodeError::OutOfRange { .. })));
        assert!(matches!(results[2].1, Err(DecodeError::Symbol { .. })));
        assert!(matches!(results[3].1, Err(DecodeError::NoBody(_))));
    }

    #[test]
    fn test_dyn_collaborators() {
        let table = metadata();
        let resolver: &dyn SymbolResolver = &table;
        let instructions = disassemble(&table, resolver, "Program::TestSleep").unwrap();
        assert_eq!(instructions.len(), 5);
    }
}
