//! The single-pass verifier: `verify()` and its per-opcode judgment rules.

use gdslv_opcodes::{Domain, Phase};

use crate::config::VerifyConfig;
use crate::diagnostics::Report;
use crate::machine::{Machine, ResourceRecord};

fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().expect("4-byte operand slice"))
}

fn read_u64_le(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(bytes.try_into().expect("8-byte operand slice"))
}

/// Verifies `stream` against `config`, returning a fully populated
/// [`Report`].
///
/// Pure function of `(stream, config)`: reads no environment, clock, or
/// random source, and holds no state beyond the single [`Machine`] value
/// allocated on entry and discarded on return. Two calls with identical
/// arguments produce field-for-field identical reports.
#[must_use]
pub fn verify(stream: &[u8], config: &VerifyConfig) -> Report {
    let mut machine = Machine::new();
    let mut report = Report::new();

    let mut offset = 0usize;
    let mut instruction_index = 0usize;

    while offset < stream.len() {
        let opcode_byte = stream[offset];

        let Some(info) = gdslv_opcodes::lookup(opcode_byte) else {
            if config.ignore_unknown_opcodes {
                tracing::trace!(instruction_index, opcode = opcode_byte, "ignored unknown opcode");
            } else {
                report.error(
                    instruction_index,
                    format!("unknown opcode {opcode_byte:#04x}"),
                );
            }
            report.instruction_count += 1;
            offset += 1;
            instruction_index += 1;
            if !report.success && !config.continue_on_error {
                break;
            }
            continue;
        };

        if offset + info.instruction_size > stream.len() {
            report.error(
                instruction_index,
                format!(
                    "truncated instruction: {} requires {} bytes, {} remain",
                    info.name,
                    info.instruction_size,
                    stream.len() - offset
                ),
            );
            break;
        }

        let operand = &stream[offset + 1..offset + info.instruction_size];
        let errors_before = report.error_count;

        tracing::debug!(
            instruction_index,
            opcode = info.name,
            phase = %machine.phase,
            "dispatching instruction"
        );

        dispatch(opcode_byte, info.name, operand, &mut machine, &mut report, instruction_index, config);

        report.instruction_count += 1;
        offset += info.instruction_size;
        instruction_index += 1;

        if report.error_count > errors_before && !config.continue_on_error {
            break;
        }
    }

    run_terminal_checks(&machine, &mut report, config);
    report
}

#[allow(clippy::too_many_arguments)]
fn dispatch(
    opcode_byte: u8,
    name: &'static str,
    operand: &[u8],
    machine: &mut Machine,
    report: &mut Report,
    idx: usize,
    config: &VerifyConfig,
) {
    use gdslv_opcodes::*;

    match opcode_byte {
        OP_BEGIN_STREAM => rule_begin_stream(machine, report, idx, config),
        OP_END_STREAM => rule_end_stream(machine, report, idx, config),
        OP_SUBMIT => rule_submit(machine, report, idx, config),
        OP_FENCE_WAIT => rule_fence_wait(read_u32_le(operand), machine, report, idx, config),
        OP_BARRIER => rule_barrier(operand, machine, report, idx, config),
        OP_ALLOC_BUFFER | OP_ALLOC_IMAGE => rule_alloc(operand, machine, report, idx, config),
        OP_FREE_BUFFER | OP_FREE_IMAGE => {
            rule_free(read_u32_le(&operand[0..4]), machine, report, idx, config);
        }
        OP_CHECKPOINT => rule_checkpoint(operand, machine, report, idx, config),
        OP_SNAPSHOT_BEGIN => rule_snapshot_begin(machine, report, idx, config),
        OP_SNAPSHOT_END => rule_snapshot_end(machine, report, idx, config),
        OP_ASSERT_IDLE => rule_assert_idle(machine, report, idx, config),
        OP_END_PROGRAM => rule_end_program(machine, report, idx, config),
        _ => rule_meta(name, opcode_byte, machine, report, idx, config),
    }
}

fn rule_begin_stream(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let mut ok = true;
    if config.level.checks_phase() {
        if !matches!(machine.phase, Phase::Build | Phase::Idle) {
            report.error(
                idx,
                format!(
                    "BEGIN_STREAM requires phase Build or Idle, found {}",
                    machine.phase
                ),
            );
            ok = false;
        }
        if machine.snapshot_active {
            report.error(idx, "BEGIN_STREAM inside an active snapshot region");
            ok = false;
        }
    }
    if ok {
        machine.phase = Phase::Record;
    }
}

fn rule_end_stream(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    if config.level.checks_phase() && machine.phase != Phase::Record {
        report.error(
            idx,
            format!("END_STREAM requires phase Record, found {}", machine.phase),
        );
    }
    if config.level.checks_domain() && !machine.fences.is_empty() {
        report.warning(
            idx,
            format!(
                "END_STREAM while {} fence(s) still outstanding",
                machine.fences.len()
            ),
        );
    }
    // The stream terminator always folds into Finished, per this
    // implementation's resolution of the END_STREAM/Finished open question.
    machine.phase = Phase::Finished;
}

fn rule_submit(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let mut ok = true;
    if config.level.checks_phase() && machine.phase != Phase::Record {
        report.error(
            idx,
            format!("SUBMIT requires phase Record, found {}", machine.phase),
        );
        ok = false;
    }
    if config.level.checks_domain() && machine.snapshot_active {
        report.error(idx, "SUBMIT during an active snapshot region");
        ok = false;
    }
    if ok {
        // Fresh, monotonic: the instruction index is unique per stream, so
        // using it directly as the fence id satisfies I2 without a counter.
        let fence_id = idx as u32;
        machine.fences.push(fence_id);
        machine.phase = Phase::Submitted;
    }
}

fn rule_fence_wait(
    fence_id: u32,
    machine: &mut Machine,
    report: &mut Report,
    idx: usize,
    config: &VerifyConfig,
) {
    let mut ok = true;
    if config.level.checks_phase() {
        if machine.phase != Phase::Submitted {
            report.error(
                idx,
                format!("FENCE_WAIT requires phase Submitted, found {}", machine.phase),
            );
            ok = false;
        }
        if !machine.fences.contains(&fence_id) {
            report.error(idx, format!("FENCE_WAIT on unknown fence id {fence_id}"));
            ok = false;
        }
    }
    if ok {
        machine.commit_pending_transitions();
        if let Some(pos) = machine.fences.iter().position(|f| *f == fence_id) {
            machine.fences.remove(pos);
        }
        machine.phase = Phase::Idle;
    }
}

fn rule_barrier(operand: &[u8], machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let resource_id = read_u32_le(&operand[0..4]);
    let src = Domain::try_from(read_u32_le(&operand[4..8]));
    let dst = Domain::try_from(read_u32_le(&operand[8..12]));

    let mut ok = true;
    if config.level.checks_phase() && machine.phase != Phase::Record {
        report.error(
            idx,
            format!("BARRIER requires phase Record, found {}", machine.phase),
        );
        ok = false;
    }

    let (Ok(src), Ok(dst)) = (src, dst) else {
        report.error(idx, format!("BARRIER on resource {resource_id} names an invalid domain"));
        return;
    };

    if config.level.checks_domain() {
        match machine.resources.get(&resource_id) {
            None => {
                report.error(idx, format!("BARRIER on unallocated resource {resource_id}"));
                ok = false;
            }
            Some(record) if !record.allocated => {
                report.error(idx, format!("BARRIER on unallocated resource {resource_id}"));
                ok = false;
            }
            Some(record) => {
                if record.domain != src {
                    report.error(
                        idx,
                        format!(
                            "BARRIER on resource {resource_id}: declared src {src} does not match current domain {}",
                            record.domain
                        ),
                    );
                    ok = false;
                }
                if record.pending_transition.is_some() {
                    report.error(
                        idx,
                        format!(
                            "BARRIER on resource {resource_id}: a transition is already pending, issue FENCE_WAIT first"
                        ),
                    );
                    ok = false;
                }
                if ok && record.domain != Domain::Device {
                    report.warning(
                        idx,
                        format!(
                            "BARRIER issued on resource {resource_id} outside Device domain (implicit promotion)"
                        ),
                    );
                }
            }
        }
    }

    if ok {
        if let Some(record) = machine.resources.get_mut(&resource_id) {
            record.pending_transition = Some((src, dst));
        }
    }
}

fn rule_alloc(operand: &[u8], machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let resource_id = read_u32_le(&operand[0..4]);
    let heap_id = read_u32_le(&operand[4..8]);
    let _size = read_u64_le(&operand[8..16]);
    let _usage = read_u32_le(&operand[16..20]);
    let flags = read_u32_le(&operand[20..24]);
    let persist_flag = flags & 0x1 != 0;

    let mut ok = true;
    if config.level.checks_phase() && !matches!(machine.phase, Phase::Record | Phase::Idle) {
        report.error(
            idx,
            format!("ALLOC requires phase Record or Idle, found {}", machine.phase),
        );
        ok = false;
    }
    if config.level.checks_domain() {
        if machine.resource_ever_seen(resource_id) {
            report.error(
                idx,
                format!("ALLOC on resource id {resource_id} already allocated or previously freed"),
            );
            ok = false;
        }
        if machine.snapshot_active {
            report.error(
                idx,
                format!("ALLOC on resource id {resource_id} inside an active snapshot region"),
            );
            ok = false;
        }
    }

    if ok {
        machine.resources.insert(
            resource_id,
            ResourceRecord {
                domain: Domain::Device,
                pending_transition: None,
                allocated: true,
                persist_flag,
                heap_id: Some(heap_id),
            },
        );
    }
}

fn rule_free(resource_id: u32, machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let mut ok = true;
    if config.level.checks_phase() && !matches!(machine.phase, Phase::Record | Phase::Idle) {
        report.error(
            idx,
            format!("FREE requires phase Record or Idle, found {}", machine.phase),
        );
        ok = false;
    }
    if config.level.checks_domain() {
        match machine.resources.get(&resource_id) {
            Some(record) if record.allocated => {}
            _ => {
                report.error(idx, format!("FREE on unallocated resource id {resource_id}"));
                ok = false;
            }
        }
    }
    if ok {
        if let Some(record) = machine.resources.get_mut(&resource_id) {
            record.allocated = false;
        }
    }
}

fn rule_checkpoint(operand: &[u8], machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let label_id = read_u32_le(&operand[0..4]);
    let mut heap_merkle_root = [0u8; 32];
    heap_merkle_root.copy_from_slice(&operand[4..36]);
    let mut pipeline_table_merkle_root = [0u8; 32];
    pipeline_table_merkle_root.copy_from_slice(&operand[36..68]);
    let stream_ptr = read_u64_le(&operand[68..76]);

    let mut ok = true;
    if config.level.checks_phase() {
        if machine.phase != Phase::Idle {
            report.error(
                idx,
                format!("CHECKPOINT requires phase Idle, found {}", machine.phase),
            );
            ok = false;
        }
        if machine.labels.contains(&label_id) {
            report.error(idx, format!("duplicate checkpoint label {label_id}"));
            ok = false;
        }
    }
    if ok {
        machine.labels.insert(label_id);
        machine.checkpoints.push(crate::machine::Checkpoint {
            label_id,
            heap_merkle_root,
            pipeline_table_merkle_root,
            stream_ptr,
        });
    }
}

fn rule_snapshot_begin(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    let mut ok = true;
    if config.level.checks_phase() {
        if machine.phase != Phase::Idle {
            report.error(
                idx,
                format!("SNAPSHOT_BEGIN requires phase Idle, found {}", machine.phase),
            );
            ok = false;
        }
        if machine.snapshot_active {
            report.error(idx, "nested SNAPSHOT_BEGIN: a snapshot region is already active");
            ok = false;
        }
    }
    if config.level.checks_domain() {
        for resource_id in machine.persistent_resource_violations() {
            report.error(
                idx,
                format!(
                    "persistent resource {resource_id} is not Host-domain-coherent at SNAPSHOT_BEGIN"
                ),
            );
            ok = false;
        }
    }
    if ok {
        machine.snapshot_active = true;
    }
}

fn rule_snapshot_end(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    if config.level.checks_phase() && !machine.snapshot_active {
        report.error(idx, "SNAPSHOT_END with no active snapshot region");
        return;
    }
    machine.snapshot_active = false;
}

fn rule_assert_idle(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    if config.level.checks_phase() && machine.phase != Phase::Idle {
        report.error(
            idx,
            format!("ASSERT_IDLE failed: phase is {}, not Idle", machine.phase),
        );
    }
}

fn rule_end_program(machine: &mut Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    if !config.level.checks_phase() {
        return;
    }
    if machine.phase != Phase::Idle {
        report.error(
            idx,
            format!("END_PROGRAM requires phase Idle, found {}", machine.phase),
        );
    }
    if !machine.fences.is_empty() {
        report.error(
            idx,
            format!(
                "END_PROGRAM with {} outstanding fence(s)",
                machine.fences.len()
            ),
        );
    }
}

fn rule_meta(name: &'static str, opcode_byte: u8, machine: &Machine, report: &mut Report, idx: usize, config: &VerifyConfig) {
    if !config.level.checks_phase() {
        return;
    }
    let Some(info) = gdslv_opcodes::lookup(opcode_byte) else {
        return;
    };
    if !info.phase_valid(machine.phase) {
        report.error(
            idx,
            format!("{name} is not valid in phase {}", machine.phase),
        );
    }
}

fn run_terminal_checks(machine: &Machine, report: &mut Report, config: &VerifyConfig) {
    let end_index = report.instruction_count;

    if config.level.checks_phase() && machine.snapshot_active {
        report.error(end_index, "unterminated snapshot region at end of stream");
    }

    if config.level.checks_phase() && !matches!(machine.phase, Phase::Idle | Phase::Finished) {
        report.error(
            end_index,
            format!(
                "stream ended in phase {}, expected Idle or Finished",
                machine.phase
            ),
        );
    }

    if config.level.checks_phase() {
        for fence_id in &machine.fences {
            report.error(end_index, format!("outstanding fence {fence_id} at end of stream"));
        }
    }
}
