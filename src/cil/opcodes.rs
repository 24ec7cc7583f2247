//! The ECMA-335 CIL opcode set.
//!
//! Values above `0xFF` are encoded as the `0xFE` prefix followed by their low byte.
//! The `prefix*` entries are `Internal`: they describe the encoding, not instructions,
//! and are left out of the [`OpcodeCatalog`](super::OpcodeCatalog).

use super::{OpCode, OpCodeType, OperandKind};
use cilreader_macros::opcode_table;

opcode_table! {
    NOP: "nop" = 0x00, InlineNone, Primitive;
    BREAK: "break" = 0x01, InlineNone, Primitive;
    LDARG_0: "ldarg.0" = 0x02, InlineNone, Macro;
    LDARG_1: "ldarg.1" = 0x03, InlineNone, Macro;
    LDARG_2: "ldarg.2" = 0x04, InlineNone, Macro;
    LDARG_3: "ldarg.3" = 0x05, InlineNone, Macro;
    LDLOC_0: "ldloc.0" = 0x06, InlineNone, Macro;
    LDLOC_1: "ldloc.1" = 0x07, InlineNone, Macro;
    LDLOC_2: "ldloc.2" = 0x08, InlineNone, Macro;
    LDLOC_3: "ldloc.3" = 0x09, InlineNone, Macro;
    STLOC_0: "stloc.0" = 0x0A, InlineNone, Macro;
    STLOC_1: "stloc.1" = 0x0B, InlineNone, Macro;
    STLOC_2: "stloc.2" = 0x0C, InlineNone, Macro;
    STLOC_3: "stloc.3" = 0x0D, InlineNone, Macro;
    LDARG_S: "ldarg.s" = 0x0E, ShortInlineArg, Macro;
    LDARGA_S: "ldarga.s" = 0x0F, ShortInlineArg, Macro;
    STARG_S: "starg.s" = 0x10, ShortInlineArg, Macro;
    LDLOC_S: "ldloc.s" = 0x11, ShortInlineLocal, Macro;
    LDLOCA_S: "ldloca.s" = 0x12, ShortInlineLocal, Macro;
    STLOC_S: "stloc.s" = 0x13, ShortInlineLocal, Macro;
    LDNULL: "ldnull" = 0x14, InlineNone, Primitive;
    LDC_I4_M1: "ldc.i4.m1" = 0x15, InlineNone, Macro;
    LDC_I4_0: "ldc.i4.0" = 0x16, InlineNone, Macro;
    LDC_I4_1: "ldc.i4.1" = 0x17, InlineNone, Macro;
    LDC_I4_2: "ldc.i4.2" = 0x18, InlineNone, Macro;
    LDC_I4_3: "ldc.i4.3" = 0x19, InlineNone, Macro;
    LDC_I4_4: "ldc.i4.4" = 0x1A, InlineNone, Macro;
    LDC_I4_5: "ldc.i4.5" = 0x1B, InlineNone, Macro;
    LDC_I4_6: "ldc.i4.6" = 0x1C, InlineNone, Macro;
    LDC_I4_7: "ldc.i4.7" = 0x1D, InlineNone, Macro;
    LDC_I4_8: "ldc.i4.8" = 0x1E, InlineNone, Macro;
    LDC_I4_S: "ldc.i4.s" = 0x1F, ShortInlineI, Macro;
    LDC_I4: "ldc.i4" = 0x20, InlineI, Primitive;
    LDC_I8: "ldc.i8" = 0x21, InlineI8, Primitive;
    LDC_R4: "ldc.r4" = 0x22, ShortInlineR, Primitive;
    LDC_R8: "ldc.r8" = 0x23, InlineR, Primitive;
    DUP: "dup" = 0x25, InlineNone, Primitive;
    POP: "pop" = 0x26, InlineNone, Primitive;
    JMP: "jmp" = 0x27, InlineMethod, Primitive;
    CALL: "call" = 0x28, InlineMethod, Primitive;
    CALLI: "calli" = 0x29, InlineSig, Primitive;
    RET: "ret" = 0x2A, InlineNone, Primitive;
    BR_S: "br.s" = 0x2B, ShortInlineBrTarget, Macro;
    BRFALSE_S: "brfalse.s" = 0x2C, ShortInlineBrTarget, Macro;
    BRTRUE_S: "brtrue.s" = 0x2D, ShortInlineBrTarget, Macro;
    BEQ_S: "beq.s" = 0x2E, ShortInlineBrTarget, Macro;
    BGE_S: "bge.s" = 0x2F, ShortInlineBrTarget, Macro;
    BGT_S: "bgt.s" = 0x30, ShortInlineBrTarget, Macro;
    BLE_S: "ble.s" = 0x31, ShortInlineBrTarget, Macro;
    BLT_S: "blt.s" = 0x32, ShortInlineBrTarget, Macro;
    BNE_UN_S: "bne.un.s" = 0x33, ShortInlineBrTarget, Macro;
    BGE_UN_S: "bge.un.s" = 0x34, ShortInlineBrTarget, Macro;
    BGT_UN_S: "bgt.un.s" = 0x35, ShortInlineBrTarget, Macro;
    BLE_UN_S: "ble.un.s" = 0x36, ShortInlineBrTarget, Macro;
    BLT_UN_S: "blt.un.s" = 0x37, ShortInlineBrTarget, Macro;
    BR: "br" = 0x38, InlineBrTarget, Primitive;
    BRFALSE: "brfalse" = 0x39, InlineBrTarget, Primitive;
    BRTRUE: "brtrue" = 0x3A, InlineBrTarget, Primitive;
    BEQ: "beq" = 0x3B, InlineBrTarget, Macro;
    BGE: "bge" = 0x3C, InlineBrTarget, Macro;
    BGT: "bgt" = 0x3D, InlineBrTarget, Macro;
    BLE: "ble" = 0x3E, InlineBrTarget, Macro;
    BLT: "blt" = 0x3F, InlineBrTarget, Macro;
    BNE_UN: "bne.un" = 0x40, InlineBrTarget, Macro;
    BGE_UN: "bge.un" = 0x41, InlineBrTarget, Macro;
    BGT_UN: "bgt.un" = 0x42, InlineBrTarget, Macro;
    BLE_UN: "ble.un" = 0x43, InlineBrTarget, Macro;
    BLT_UN: "blt.un" = 0x44, InlineBrTarget, Macro;
    SWITCH: "switch" = 0x45, InlineSwitch, Primitive;
    LDIND_I1: "ldind.i1" = 0x46, InlineNone, Primitive;
    LDIND_U1: "ldind.u1" = 0x47, InlineNone, Primitive;
    LDIND_I2: "ldind.i2" = 0x48, InlineNone, Primitive;
    LDIND_U2: "ldind.u2" = 0x49, InlineNone, Primitive;
    LDIND_I4: "ldind.i4" = 0x4A, InlineNone, Primitive;
    LDIND_U4: "ldind.u4" = 0x4B, InlineNone, Primitive;
    LDIND_I8: "ldind.i8" = 0x4C, InlineNone, Primitive;
    LDIND_I: "ldind.i" = 0x4D, InlineNone, Primitive;
    LDIND_R4: "ldind.r4" = 0x4E, InlineNone, Primitive;
    LDIND_R8: "ldind.r8" = 0x4F, InlineNone, Primitive;
    LDIND_REF: "ldind.ref" = 0x50, InlineNone, Primitive;
    STIND_REF: "stind.ref" = 0x51, InlineNone, Primitive;
    STIND_I1: "stind.i1" = 0x52, InlineNone, Primitive;
    STIND_I2: "stind.i2" = 0x53, InlineNone, Primitive;
    STIND_I4: "stind.i4" = 0x54, InlineNone, Primitive;
    STIND_I8: "stind.i8" = 0x55, InlineNone, Primitive;
    STIND_R4: "stind.r4" = 0x56, InlineNone, Primitive;
    STIND_R8: "stind.r8" = 0x57, InlineNone, Primitive;
    ADD: "add" = 0x58, InlineNone, Primitive;
    SUB: "sub" = 0x59, InlineNone, Primitive;
    MUL: "mul" = 0x5A, InlineNone, Primitive;
    DIV: "div" = 0x5B, InlineNone, Primitive;
    DIV_UN: "div.un" = 0x5C, InlineNone, Primitive;
    REM: "rem" = 0x5D, InlineNone, Primitive;
    REM_UN: "rem.un" = 0x5E, InlineNone, Primitive;
    AND: "and" = 0x5F, InlineNone, Primitive;
    OR: "or" = 0x60, InlineNone, Primitive;
    XOR: "xor" = 0x61, InlineNone, Primitive;
    SHL: "shl" = 0x62, InlineNone, Primitive;
    SHR: "shr" = 0x63, InlineNone, Primitive;
    SHR_UN: "shr.un" = 0x64, InlineNone, Primitive;
    NEG: "neg" = 0x65, InlineNone, Primitive;
    NOT: "not" = 0x66, InlineNone, Primitive;
    CONV_I1: "conv.i1" = 0x67, InlineNone, Primitive;
    CONV_I2: "conv.i2" = 0x68, InlineNone, Primitive;
    CONV_I4: "conv.i4" = 0x69, InlineNone, Primitive;
    CONV_I8: "conv.i8" = 0x6A, InlineNone, Primitive;
    CONV_R4: "conv.r4" = 0x6B, InlineNone, Primitive;
    CONV_R8: "conv.r8" = 0x6C, InlineNone, Primitive;
    CONV_U4: "conv.u4" = 0x6D, InlineNone, Primitive;
    CONV_U8: "conv.u8" = 0x6E, InlineNone, Primitive;
    CALLVIRT: "callvirt" = 0x6F, InlineMethod, ObjModel;
    CPOBJ: "cpobj" = 0x70, InlineType, ObjModel;
    LDOBJ: "ldobj" = 0x71, InlineType, ObjModel;
    LDSTR: "ldstr" = 0x72, InlineString, ObjModel;
    NEWOBJ: "newobj" = 0x73, InlineMethod, ObjModel;
    CASTCLASS: "castclass" = 0x74, InlineType, ObjModel;
    ISINST: "isinst" = 0x75, InlineType, ObjModel;
    CONV_R_UN: "conv.r.un" = 0x76, InlineNone, Primitive;
    UNBOX: "unbox" = 0x79, InlineType, Primitive;
    THROW: "throw" = 0x7A, InlineNone, ObjModel;
    LDFLD: "ldfld" = 0x7B, InlineField, ObjModel;
    LDFLDA: "ldflda" = 0x7C, InlineField, ObjModel;
    STFLD: "stfld" = 0x7D, InlineField, ObjModel;
    LDSFLD: "ldsfld" = 0x7E, InlineField, ObjModel;
    LDSFLDA: "ldsflda" = 0x7F, InlineField, ObjModel;
    STSFLD: "stsfld" = 0x80, InlineField, ObjModel;
    STOBJ: "stobj" = 0x81, InlineType, Primitive;
    CONV_OVF_I1_UN: "conv.ovf.i1.un" = 0x82, InlineNone, Primitive;
    CONV_OVF_I2_UN: "conv.ovf.i2.un" = 0x83, InlineNone, Primitive;
    CONV_OVF_I4_UN: "conv.ovf.i4.un" = 0x84, InlineNone, Primitive;
    CONV_OVF_I8_UN: "conv.ovf.i8.un" = 0x85, InlineNone, Primitive;
    CONV_OVF_U1_UN: "conv.ovf.u1.un" = 0x86, InlineNone, Primitive;
    CONV_OVF_U2_UN: "conv.ovf.u2.un" = 0x87, InlineNone, Primitive;
    CONV_OVF_U4_UN: "conv.ovf.u4.un" = 0x88, InlineNone, Primitive;
    CONV_OVF_U8_UN: "conv.ovf.u8.un" = 0x89, InlineNone, Primitive;
    CONV_OVF_I_UN: "conv.ovf.i.un" = 0x8A, InlineNone, Primitive;
    CONV_OVF_U_UN: "conv.ovf.u.un" = 0x8B, InlineNone, Primitive;
    BOX: "box" = 0x8C, InlineType, Primitive;
    NEWARR: "newarr" = 0x8D, InlineType, ObjModel;
    LDLEN: "ldlen" = 0x8E, InlineNone, ObjModel;
    LDELEMA: "ldelema" = 0x8F, InlineType, ObjModel;
    LDELEM_I1: "ldelem.i1" = 0x90, InlineNone, ObjModel;
    LDELEM_U1: "ldelem.u1" = 0x91, InlineNone, ObjModel;
    LDELEM_I2: "ldelem.i2" = 0x92, InlineNone, ObjModel;
    LDELEM_U2: "ldelem.u2" = 0x93, InlineNone, ObjModel;
    LDELEM_I4: "ldelem.i4" = 0x94, InlineNone, ObjModel;
    LDELEM_U4: "ldelem.u4" = 0x95, InlineNone, ObjModel;
    LDELEM_I8: "ldelem.i8" = 0x96, InlineNone, ObjModel;
    LDELEM_I: "ldelem.i" = 0x97, InlineNone, ObjModel;
    LDELEM_R4: "ldelem.r4" = 0x98, InlineNone, ObjModel;
    LDELEM_R8: "ldelem.r8" = 0x99, InlineNone, ObjModel;
    LDELEM_REF: "ldelem.ref" = 0x9A, InlineNone, ObjModel;
    STELEM_I: "stelem.i" = 0x9B, InlineNone, ObjModel;
    STELEM_I1: "stelem.i1" = 0x9C, InlineNone, ObjModel;
    STELEM_I2: "stelem.i2" = 0x9D, InlineNone, ObjModel;
    STELEM_I4: "stelem.i4" = 0x9E, InlineNone, ObjModel;
    STELEM_I8: "stelem.i8" = 0x9F, InlineNone, ObjModel;
    STELEM_R4: "stelem.r4" = 0xA0, InlineNone, ObjModel;
    STELEM_R8: "stelem.r8" = 0xA1, InlineNone, ObjModel;
    STELEM_REF: "stelem.ref" = 0xA2, InlineNone, ObjModel;
    LDELEM: "ldelem" = 0xA3, InlineType, ObjModel;
    STELEM: "stelem" = 0xA4, InlineType, ObjModel;
    UNBOX_ANY: "unbox.any" = 0xA5, InlineType, ObjModel;
    CONV_OVF_I1: "conv.ovf.i1" = 0xB3, InlineNone, Primitive;
    CONV_OVF_U1: "conv.ovf.u1" = 0xB4, InlineNone, Primitive;
    CONV_OVF_I2: "conv.ovf.i2" = 0xB5, InlineNone, Primitive;
    CONV_OVF_U2: "conv.ovf.u2" = 0xB6, InlineNone, Primitive;
    CONV_OVF_I4: "conv.ovf.i4" = 0xB7, InlineNone, Primitive;
    CONV_OVF_U4: "conv.ovf.u4" = 0xB8, InlineNone, Primitive;
    CONV_OVF_I8: "conv.ovf.i8" = 0xB9, InlineNone, Primitive;
    CONV_OVF_U8: "conv.ovf.u8" = 0xBA, InlineNone, Primitive;
    REFANYVAL: "refanyval" = 0xC2, InlineType, Primitive;
    CKFINITE: "ckfinite" = 0xC3, InlineNone, Primitive;
    MKREFANY: "mkrefany" = 0xC6, InlineType, Primitive;
    LDTOKEN: "ldtoken" = 0xD0, InlineTok, Primitive;
    CONV_U2: "conv.u2" = 0xD1, InlineNone, Primitive;
    CONV_U1: "conv.u1" = 0xD2, InlineNone, Primitive;
    CONV_I: "conv.i" = 0xD3, InlineNone, Primitive;
    CONV_OVF_I: "conv.ovf.i" = 0xD4, InlineNone, Primitive;
    CONV_OVF_U: "conv.ovf.u" = 0xD5, InlineNone, Primitive;
    ADD_OVF: "add.ovf" = 0xD6, InlineNone, Primitive;
    ADD_OVF_UN: "add.ovf.un" = 0xD7, InlineNone, Primitive;
    MUL_OVF: "mul.ovf" = 0xD8, InlineNone, Primitive;
    MUL_OVF_UN: "mul.ovf.un" = 0xD9, InlineNone, Primitive;
    SUB_OVF: "sub.ovf" = 0xDA, InlineNone, Primitive;
    SUB_OVF_UN: "sub.ovf.un" = 0xDB, InlineNone, Primitive;
    ENDFINALLY: "endfinally" = 0xDC, InlineNone, Primitive;
    LEAVE: "leave" = 0xDD, InlineBrTarget, Primitive;
    LEAVE_S: "leave.s" = 0xDE, ShortInlineBrTarget, Primitive;
    STIND_I: "stind.i" = 0xDF, InlineNone, Primitive;
    CONV_U: "conv.u" = 0xE0, InlineNone, Primitive;
    PREFIX7: "prefix7" = 0xF8, InlineNone, Internal;
    PREFIX6: "prefix6" = 0xF9, InlineNone, Internal;
    PREFIX5: "prefix5" = 0xFA, InlineNone, Internal;
    PREFIX4: "prefix4" = 0xFB, InlineNone, Internal;
    PREFIX3: "prefix3" = 0xFC, InlineNone, Internal;
    PREFIX2: "prefix2" = 0xFD, InlineNone, Internal;
    PREFIX1: "prefix1" = 0xFE, InlineNone, Internal;
    PREFIXREF: "prefixref" = 0xFF, InlineNone, Internal;
    ARGLIST: "arglist" = 0xFE00, InlineNone, Primitive;
    CEQ: "ceq" = 0xFE01, InlineNone, Primitive;
    CGT: "cgt" = 0xFE02, InlineNone, Primitive;
    CGT_UN: "cgt.un" = 0xFE03, InlineNone, Primitive;
    CLT: "clt" = 0xFE04, InlineNone, Primitive;
    CLT_UN: "clt.un" = 0xFE05, InlineNone, Primitive;
    LDFTN: "ldftn" = 0xFE06, InlineMethod, Primitive;
    LDVIRTFTN: "ldvirtftn" = 0xFE07, InlineMethod, Primitive;
    LDARG: "ldarg" = 0xFE09, InlineArg, Primitive;
    LDARGA: "ldarga" = 0xFE0A, InlineArg, Primitive;
    STARG: "starg" = 0xFE0B, InlineArg, Primitive;
    LDLOC: "ldloc" = 0xFE0C, InlineLocal, Primitive;
    LDLOCA: "ldloca" = 0xFE0D, InlineLocal, Primitive;
    STLOC: "stloc" = 0xFE0E, InlineLocal, Primitive;
    LOCALLOC: "localloc" = 0xFE0F, InlineNone, Primitive;
    ENDFILTER: "endfilter" = 0xFE11, InlineNone, Primitive;
    UNALIGNED: "unaligned." = 0xFE12, ShortInlineI, Prefix;
    VOLATILE: "volatile." = 0xFE13, InlineNone, Prefix;
    TAIL: "tail." = 0xFE14, InlineNone, Prefix;
    INITOBJ: "initobj" = 0xFE15, InlineType, ObjModel;
    CONSTRAINED: "constrained." = 0xFE16, InlineType, Prefix;
    CPBLK: "cpblk" = 0xFE17, InlineNone, Primitive;
    INITBLK: "initblk" = 0xFE18, InlineNone, Primitive;
    NO: "no." = 0xFE19, ShortInlineI, Prefix;
    RETHROW: "rethrow" = 0xFE1A, InlineNone, ObjModel;
    SIZEOF: "sizeof" = 0xFE1C, InlineType, Primitive;
    REFANYTYPE: "refanytype" = 0xFE1D, InlineNone, Primitive;
    READONLY: "readonly." = 0xFE1E, InlineNone, Prefix;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_byte_opcodes_carry_prefix() {
        for opcode in DEFINITIONS.iter().filter(|op| op.size() == 2) {
            assert_eq!(opcode.value() >> 8, 0xFE, "{}", opcode.name());
        }
    }

    #[test]
    fn test_internal_opcodes_are_prefixes() {
        let internal: Vec<_> = DEFINITIONS
            .iter()
            .filter(|op| op.opcode_type() == OpCodeType::Internal)
            .map(|op| op.name())
            .collect();
        assert_eq!(internal.len(), 8);
        assert!(internal.iter().all(|name| name.starts_with("prefix")));
    }

    #[test]
    fn test_constants_match_encoding() {
        assert_eq!(NOP.value(), 0x00);
        assert_eq!(LDC_I4_S.operand_kind(), OperandKind::ShortInlineI);
        assert_eq!(CEQ.size(), 2);
        assert_eq!(CEQ.table_index(), 0x01);
        assert_eq!(SWITCH.operand_kind(), OperandKind::InlineSwitch);
    }
}
