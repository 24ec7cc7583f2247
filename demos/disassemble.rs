use cilreader_rs::cil::{opcodes, IlEncoder};
use cilreader_rs::disassemble;
use cilreader_rs::metadata::{
    LocalVariable, Member, MemberKind, MetadataTable, MethodBody, Parameter, Token,
};
use log::debug;

fn main() {
    pretty_env_logger::init();

    let mut metadata = MetadataTable::new();
    metadata
        .add_string(Token(0x7000_0001), "Elapsed time: ")
        .add_member(
            Token(0x0A00_0001),
            Member::new(
                MemberKind::Method,
                "System.Threading.Thread::Sleep(System.TimeSpan)",
            ),
        )
        .add_member(
            Token(0x0A00_0002),
            Member::new(MemberKind::Method, "System.Console::WriteLine(System.String)"),
        );

    // static void TestSleep(TimeSpan timeToSleep) { Thread.Sleep(timeToSleep); }
    metadata.add_method(
        "Program::TestSleep",
        MethodBody {
            il: IlEncoder::new()
                .op(opcodes::NOP)
                .op(opcodes::LDARG_0)
                .op(opcodes::CALL)
                .token(Token(0x0A00_0001))
                .op(opcodes::NOP)
                .op(opcodes::RET)
                .finish(),
            parameters: vec![Parameter::new(0, "timeToSleep", "System.TimeSpan")],
            ..Default::default()
        },
    );

    // A counted loop printing a label, with a jump table on the counter.
    metadata.add_method(
        "Program::Loop",
        MethodBody {
            il: IlEncoder::new()
                .op(opcodes::LDC_I4_0)
                .op(opcodes::STLOC_0)
                .op(opcodes::BR_S)
                .i8(29)
                .op(opcodes::LDLOC_0)
                .op(opcodes::SWITCH)
                .switch_table(&[0, 5])
                .op(opcodes::LDSTR)
                .token(Token(0x7000_0001))
                .op(opcodes::CALL)
                .token(Token(0x0A00_0002))
                .op(opcodes::LDLOC_S)
                .u8(0)
                .op(opcodes::LDC_I4_1)
                .op(opcodes::ADD)
                .op(opcodes::STLOC_0)
                .op(opcodes::LDLOC_0)
                .op(opcodes::LDC_I4_S)
                .i8(10)
                .op(opcodes::BLT_S)
                .i8(-34)
                .op(opcodes::RET)
                .finish(),
            locals: vec![LocalVariable::new(0, "System.Int32")],
            ..Default::default()
        },
    );

    for method in ["Program::TestSleep", "Program::Loop", "Program::Missing"] {
        println!("\nMethod: {method}");
        match disassemble(&metadata, &metadata, method) {
            Ok(instructions) => {
                debug!("{} bytes decoded", instructions.byte_len());
                print!("{instructions}");
            }
            Err(err) => println!("cannot disassemble: {err}"),
        }
    }
}
