//! Main disassembler logic

use crate::decoder::decode;
use crate::formatter::{format, format_data, opcode_name};
use splice_spec::Task;

/// Disassemble a task into assembler-compatible lines, one per word
///
/// Code words that do not decode are emitted as integer literals, so the
/// output always assembles back into the same words.
pub fn disassemble(task: &Task) -> Vec<String> {
    let h = task.header;
    let mut lines = Vec::with_capacity(task.len());
    lines.push(format!("{},{},{},{}", h.id.group, h.id.task, h.frequency, h.data_offset));

    let offset = h.data_offset as usize;
    for (index, &word) in task.words.iter().enumerate().skip(1) {
        let line = if index < offset {
            decode(word).map_or_else(|_| format_data(word), |instr| format(&instr))
        } else {
            format_data(word)
        };
        lines.push(line);
    }

    lines
}

/// Annotated listing with word indices and raw encodings
pub fn listing(task: &Task) -> String {
    let h = task.header;
    let mut output = String::new();

    output.push_str("; SPLICE task listing\n");
    output.push_str(&format!(
        "; Task {}: frequency 0x{:02X}, data offset {}\n",
        h.id, h.frequency, h.data_offset
    ));
    output.push_str(&format!(
        "; {} words ({} code, {} data)\n\n",
        task.len(),
        task.code().len(),
        task.data().len()
    ));

    let offset = h.data_offset as usize;
    for (index, &word) in task.words.iter().enumerate().skip(1) {
        output.push_str(&format!("{:03}:  {:08X}  ", index, word));

        if index < offset {
            match decode(word) {
                Ok(instr) => output.push_str(&format(&instr)),
                Err(e) => {
                    let name = opcode_name((word >> 24) as u8).unwrap_or("??");
                    output.push_str(&format!("; ERROR ({}): {}", name, e));
                }
            }
        } else {
            output.push_str(&format!("{}  ; data +{}", format_data(word), index - offset));
        }

        output.push('\n');
    }

    output
}
