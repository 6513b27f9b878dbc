//! Property tests for parsing, validation and wrap-around arithmetic.

use bfvm::{ByteInput, Machine, MachineError, Memory, Program};
use proptest::prelude::*;

/// Strings mixing instruction symbols with arbitrary comment text.
fn commented_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::sample::select(vec!['>', '<', '+', '-', ',', '.', '[', ']']).prop_map(String::from),
            "[a-zA-Z0-9 #\n\t]{0,8}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Programs built only from moves, arithmetic and output, with no loops or input.
fn straight_line_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['>', '<', '+', '-', '.']), 1..200)
        .prop_map(|symbols| symbols.into_iter().collect())
}

/// Depth scan used as an oracle for bracket balance.
fn balanced(symbols: &[u8]) -> bool {
    let mut depth = 0i64;
    for &symbol in symbols {
        match symbol {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    #[test]
    fn comments_never_reach_the_instructions(source in commented_source()) {
        let program = Program::from_source(source.as_str());
        let expected: Vec<u8> = source.bytes().filter(|b| b"><+-,.[]".contains(b)).collect();
        prop_assert_eq!(program.instructions(), expected.as_slice());
        prop_assert_eq!(program.size(), expected.len());
    }

    #[test]
    fn validity_matches_a_depth_scan(source in commented_source()) {
        let program = Program::from_source(source.as_str());
        let instructions = program.instructions();
        prop_assert_eq!(program.is_valid(), !instructions.is_empty() && balanced(instructions));
    }

    #[test]
    fn instruction_access_is_bounds_checked(source in commented_source(), index in 0usize..64) {
        let program = Program::from_source(source.as_str());
        match program.instruction(index) {
            Ok(symbol) => prop_assert_eq!(symbol, program.instructions()[index]),
            Err(MachineError::IndexOutOfBounds { index: i, size }) => {
                prop_assert_eq!(i, index);
                prop_assert!(index >= size);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn pointers_and_cells_stay_in_range(
        source in straight_line_source(),
        size in 1usize..16,
        maximum in 0i64..300,
    ) {
        // Outputs only accept bytes, so cap the range at 255.
        let memory = Memory::new(size, 0, maximum.min(255), 0).unwrap();
        let mut machine = Machine::with_parts(Program::from_source(source.as_str()), memory, ByteInput::new(std::io::empty()), Vec::new());
        machine.run().unwrap();
        prop_assert!(machine.data_pointer() < size);
        prop_assert_eq!(machine.instruction_pointer(), source.len());
        let memory = machine.memory();
        prop_assert!(memory.cells().iter().all(|&cell| memory.contains(cell)));
    }

    #[test]
    fn memory_rejects_every_index_past_the_end(size in 1usize..64, extra in 0usize..1000) {
        let mut memory = Memory::with_size(size).unwrap();
        let is_out_of_bounds = |result: Result<(), MachineError>| {
            matches!(result, Err(MachineError::IndexOutOfBounds { .. }))
        };
        prop_assert!(is_out_of_bounds(memory.read(size + extra).map(|_| ())));
        prop_assert!(is_out_of_bounds(memory.write(size + extra, 0)));
    }
}
