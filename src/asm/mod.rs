//! Line-oriented assembly front-end: the textual twin of the color
//! pipeline. Each line is one instruction; `#` starts a comment; labels are
//! declared with `LABEL name` and referenced by `JMP`/`JEZ`. Assembling
//! produces the same instruction graph the region pipeline builds, so the
//! block builder, interpreters and emitter apply unchanged.

use crate::error::{Error, Result};
use crate::program::{Arg, Node, Opcode, ProgramGraph, Succ};
use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mnemonic {
    Push,
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Not,
    Greater,
    Dup,
    Swap,
    Roll,
    Inn,
    Inc,
    Outn,
    Outc,
    Halt,
    Label,
    Jez,
    Jmp,
}

lazy_static! {
    static ref MNEMONICS: HashMap<&'static str, Mnemonic> = {
        let mut map = HashMap::new();
        map.insert("PUSH", Mnemonic::Push);
        map.insert("POP", Mnemonic::Pop);
        map.insert("ADD", Mnemonic::Add);
        map.insert("SUB", Mnemonic::Sub);
        map.insert("MUL", Mnemonic::Mul);
        map.insert("DIV", Mnemonic::Div);
        map.insert("MOD", Mnemonic::Mod);
        map.insert("NOT", Mnemonic::Not);
        map.insert("GREATER", Mnemonic::Greater);
        map.insert("DUP", Mnemonic::Dup);
        map.insert("SWAP", Mnemonic::Swap);
        map.insert("ROLL", Mnemonic::Roll);
        map.insert("INN", Mnemonic::Inn);
        map.insert("INC", Mnemonic::Inc);
        map.insert("OUTN", Mnemonic::Outn);
        map.insert("OUTC", Mnemonic::Outc);
        map.insert("HALT", Mnemonic::Halt);
        map.insert("LABEL", Mnemonic::Label);
        map.insert("JEZ", Mnemonic::Jez);
        map.insert("JMP", Mnemonic::Jmp);
        map
    };
}

#[derive(Debug)]
struct Statement {
    mnemonic: Mnemonic,
    /// `PUSH` constant
    value: i32,
    /// Resolved statement index for `LABEL`/`JMP`/`JEZ`
    target: usize,
}

/// One source line reduced to its tokens: line number and the words before
/// any comment
fn tokenize(source: &str) -> Vec<(usize, Vec<&str>)> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let code = raw.split('#').next().unwrap_or("");
        let tokens: Vec<&str> = code.split_whitespace().collect();
        if !tokens.is_empty() {
            lines.push((index + 1, tokens));
        }
    }
    lines
}

fn operand<'a>(line: usize, tokens: &[&'a str], mnemonic: &str) -> Result<&'a str> {
    tokens.get(1).copied().ok_or_else(|| Error::MissingOperand {
        line,
        mnemonic: mnemonic.to_string(),
    })
}

fn parse_statement(
    line: usize,
    tokens: &[&str],
    labels: &HashMap<&str, usize>,
) -> Result<Statement> {
    let token = tokens[0];
    let mnemonic = *MNEMONICS.get(token).ok_or_else(|| Error::UnknownMnemonic {
        line,
        token: token.to_string(),
    })?;
    let mut statement = Statement {
        mnemonic,
        value: 0,
        target: 0,
    };
    match mnemonic {
        Mnemonic::Push => {
            let token = operand(line, tokens, "PUSH")?;
            statement.value = token.parse().map_err(|_| Error::InvalidOperand {
                line,
                token: token.to_string(),
            })?;
        }
        Mnemonic::Label | Mnemonic::Jmp | Mnemonic::Jez => {
            let name = operand(line, tokens, token)?;
            statement.target = *labels.get(name).ok_or_else(|| Error::UndefinedLabel {
                line,
                label: name.to_string(),
            })?;
        }
        _ => {}
    }
    Ok(statement)
}

/// Assembles a listing into an instruction graph. Labels resolve in a first
/// pass so forward jumps work; an unknown mnemonic or unresolved label
/// aborts before any graph is built. A listing that can fall off its last
/// line gets an implicit trailing halt.
pub fn assemble(source: &str) -> Result<ProgramGraph> {
    let lines = tokenize(source);
    let mut labels: HashMap<&str, usize> = HashMap::new();
    for (index, (_, tokens)) in lines.iter().enumerate() {
        if tokens[0] == "LABEL" {
            if let Some(&name) = tokens.get(1) {
                labels.insert(name, index);
            }
        }
    }
    let mut statements = Vec::with_capacity(lines.len());
    for (line, tokens) in &lines {
        statements.push(parse_statement(*line, tokens, &labels)?);
    }

    let tail = statements.len();
    let mut nodes = Vec::with_capacity(tail + 1);
    for (index, statement) in statements.iter().enumerate() {
        let next = index + 1;
        let node = match statement.mnemonic {
            Mnemonic::Halt => Node {
                op: Opcode::Halt,
                arg: Arg::None,
                succ: Succ::Halt,
            },
            Mnemonic::Label => Node {
                op: Opcode::Nop,
                arg: Arg::None,
                succ: Succ::One(next),
            },
            Mnemonic::Jmp => Node {
                op: Opcode::Nop,
                arg: Arg::None,
                succ: Succ::One(statement.target),
            },
            Mnemonic::Jez => Node {
                op: Opcode::Jez,
                arg: Arg::None,
                succ: Succ::Two([next, statement.target]),
            },
            Mnemonic::Push => Node {
                op: Opcode::Push,
                arg: Arg::Value(statement.value),
                succ: Succ::One(next),
            },
            plain => Node {
                op: opcode_of(plain),
                arg: Arg::None,
                succ: Succ::One(next),
            },
        };
        nodes.push(node);
    }
    // implicit halt for execution running off the end of the listing
    nodes.push(Node {
        op: Opcode::Halt,
        arg: Arg::None,
        succ: Succ::Halt,
    });
    debug!(statements = tail, "assembled listing");
    Ok(ProgramGraph::from_parts(nodes, 0))
}

fn opcode_of(mnemonic: Mnemonic) -> Opcode {
    match mnemonic {
        Mnemonic::Pop => Opcode::Pop,
        Mnemonic::Add => Opcode::Add,
        Mnemonic::Sub => Opcode::Subtract,
        Mnemonic::Mul => Opcode::Multiply,
        Mnemonic::Div => Opcode::Divide,
        Mnemonic::Mod => Opcode::Modulo,
        Mnemonic::Not => Opcode::Not,
        Mnemonic::Greater => Opcode::Greater,
        Mnemonic::Dup => Opcode::Duplicate,
        Mnemonic::Swap => Opcode::Swap,
        Mnemonic::Roll => Opcode::Roll,
        Mnemonic::Inn => Opcode::InNumber,
        Mnemonic::Inc => Opcode::InChar,
        Mnemonic::Outn => Opcode::OutNumber,
        Mnemonic::Outc => Opcode::OutChar,
        Mnemonic::Push | Mnemonic::Halt | Mnemonic::Label | Mnemonic::Jez | Mnemonic::Jmp => {
            unreachable!("handled before the plain mapping")
        }
    }
}
