//! Shared SIMD forward kernel.
//!
//! One generic implementation of the three-state forward recurrence,
//! parameterized over a `SimdFloat` engine. Each vector lane carries one
//! independent (haplotype, read) pair; all lanes advance in lockstep
//! through read positions (rows) and haplotype positions (columns) on the
//! SoA buffers packed by `workspace::LaneBuffers`.
//!
//! Lanes whose read is shorter than the longest in the group keep running
//! on neutral padding (zero transitions, N bases); their result is
//! extracted at their own final row, so padding never contaminates an
//! active lane. The kernel stores only two rows per matrix (previous and
//! current), which keeps working space at O(max_hap_len * lanes).
//!
//! Safety: callers must ensure the engine's ISA is supported on the running
//! CPU (the dispatch layer guarantees this) and that the inputs were packed
//! at `stride == E::LANES`.

use crate::core::compute::simd_abstraction::SimdFloat;
use crate::core::pairhmm::types::{Precision, BASE_N};
use crate::core::pairhmm::workspace::MatrixRows;

/// Borrowed view of one packed lane group, consumed by the forward kernels.
///
/// All per-position slices use `position * stride + lane` addressing; see
/// `workspace::LaneBuffers` for the packing rules.
#[derive(Debug)]
pub struct KernelInputs<'a, F> {
    /// Haplotype bases, padded with N.
    pub hap_soa: &'a [F],
    /// Read bases, padded with N.
    pub read_soa: &'a [F],
    pub t_match_match: &'a [F],
    pub t_indel_match: &'a [F],
    pub t_match_ins: &'a [F],
    pub t_ins_ins: &'a [F],
    pub t_match_del: &'a [F],
    pub t_del_del: &'a [F],
    pub emit_match: &'a [F],
    pub emit_mismatch: &'a [F],
    /// Per-lane deletion boundary mass (`initial_constant / hap_len`).
    pub init_d: &'a [F],
    pub hap_len: &'a [usize],
    pub read_len: &'a [usize],
    /// Active lanes in this group (may be fewer than `stride`).
    pub lanes: usize,
    /// SIMD lane count of the engine this group was packed for.
    pub stride: usize,
    pub max_hap_len: usize,
    pub max_read_len: usize,
}

/// Advance the forward recurrence for up to `E::LANES` pairs at once and
/// write each lane's raw scaled probability sum into `out`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_kernel<E: SimdFloat>(
    inputs: &KernelInputs<'_, E::Elem>,
    rows: &mut MatrixRows<E::Elem>,
    out: &mut [f64],
) where
    E::Elem: Precision,
{
    let w = E::LANES;
    debug_assert_eq!(inputs.stride, w, "inputs packed for a different lane width");
    debug_assert!(out.len() >= inputs.lanes);

    let cols = inputs.max_hap_len;
    rows.ensure(w, cols);

    let zero = E::setzero();
    let n_vec = E::set1(<E::Elem as Precision>::from_f64(BASE_N as f64));

    // Row 0: no mass in M or I; the deletion row carries the per-lane
    // boundary mass that models free entry at any haplotype position.
    {
        let mp = rows.m_prev.as_mut_ptr();
        let ip = rows.i_prev.as_mut_ptr();
        let dp = rows.d_prev.as_mut_ptr();
        let init_vec = E::loadu(inputs.init_d.as_ptr());
        for j in 0..=cols {
            E::storeu(mp.add(j * w), zero);
            E::storeu(ip.add(j * w), zero);
            E::storeu(dp.add(j * w), init_vec);
        }
    }

    for i in 1..=inputs.max_read_len {
        let row_off = (i - 1) * w;
        {
            let t_mm = E::loadu(inputs.t_match_match.as_ptr().add(row_off));
            let t_im = E::loadu(inputs.t_indel_match.as_ptr().add(row_off));
            let t_mi = E::loadu(inputs.t_match_ins.as_ptr().add(row_off));
            let t_ii = E::loadu(inputs.t_ins_ins.as_ptr().add(row_off));
            let t_md = E::loadu(inputs.t_match_del.as_ptr().add(row_off));
            let t_dd = E::loadu(inputs.t_del_del.as_ptr().add(row_off));
            let em = E::loadu(inputs.emit_match.as_ptr().add(row_off));
            let ex = E::loadu(inputs.emit_mismatch.as_ptr().add(row_off));
            let read_vec = E::loadu(inputs.read_soa.as_ptr().add(row_off));
            let read_is_n = E::cmpeq(read_vec, n_vec);

            let mp = rows.m_prev.as_ptr();
            let ip = rows.i_prev.as_ptr();
            let dp = rows.d_prev.as_ptr();
            let mc = rows.m_curr.as_mut_ptr();
            let ic = rows.i_curr.as_mut_ptr();
            let dc = rows.d_curr.as_mut_ptr();

            // Column 0: impossible to be inside the read before consuming
            // any read base.
            E::storeu(mc, zero);
            E::storeu(ic, zero);
            E::storeu(dc, zero);

            let mut m_left = zero;
            let mut d_left = zero;

            for j in 1..=cols {
                let col_off = j * w;
                let hap_off = (j - 1) * w;

                let hap_vec = E::loadu(inputs.hap_soa.as_ptr().add(hap_off));
                let m_diag = E::loadu(mp.add(hap_off));
                let i_diag = E::loadu(ip.add(hap_off));
                let d_diag = E::loadu(dp.add(hap_off));
                let m_up = E::loadu(mp.add(col_off));
                let i_up = E::loadu(ip.add(col_off));

                let eq = E::cmpeq(read_vec, hap_vec);
                let hap_is_n = E::cmpeq(hap_vec, n_vec);
                let matches = E::mask_or(eq, E::mask_or(read_is_n, hap_is_n));
                let prior = E::blendv(ex, em, matches);

                let m_val = E::mul(
                    prior,
                    E::add(
                        E::mul(m_diag, t_mm),
                        E::mul(E::add(i_diag, d_diag), t_im),
                    ),
                );
                let i_val = E::add(E::mul(m_up, t_mi), E::mul(i_up, t_ii));
                let d_val = E::add(E::mul(m_left, t_md), E::mul(d_left, t_dd));

                E::storeu(mc.add(col_off), m_val);
                E::storeu(ic.add(col_off), i_val);
                E::storeu(dc.add(col_off), d_val);

                m_left = m_val;
                d_left = d_val;
            }
        }

        // Lanes whose read ends at this row yield their result now, summed
        // over their own haplotype length only.
        for lane in 0..inputs.lanes {
            if inputs.read_len[lane] == i {
                let mut acc = <E::Elem as Precision>::ZERO;
                for j in 1..=inputs.hap_len[lane] {
                    let off = j * w + lane;
                    acc = acc + rows.m_curr[off] + rows.i_curr[off] + rows.d_curr[off];
                }
                out[lane] = acc.to_f64();
            }
        }

        rows.swap();
    }
}
