//! Reusable scratch buffers for the forward kernels.
//!
//! Two pieces of transient state back every kernel invocation: the
//! structure-of-arrays inputs for one lane group (`LaneBuffers`) and the
//! rolling match/insertion/deletion rows (`MatrixRows`). Both are owned by
//! one evaluator, grown monotonically to the largest pair seen, and reset
//! rather than reallocated between chunks. The evaluator keeps one arena
//! per precision tier.
//!
//! ## SoA layout
//!
//! All per-position buffers use `position * stride + lane` addressing, where
//! `stride` is the SIMD lane count of the active engine. Lanes beyond the
//! chunk (and haplotype/read positions beyond a lane's own length) are
//! padded with neutral values: the unknown base for sequence data, zero for
//! transition and emission tracks. Padded lanes decay to zero mass and are
//! never read back, so they cannot influence active lanes.

use crate::core::pairhmm::kernel::KernelInputs;
use crate::core::pairhmm::quality::qual_to_error_prob;
use crate::core::pairhmm::types::{Precision, TestCase, BASE_N};

/// Rolling two-row storage for the three forward matrices.
///
/// The recurrence only ever looks one row back, so each matrix keeps a
/// previous and a current row of `(max_hap_len + 1) * stride` cells. Rows
/// are swapped, not copied, after each read position.
#[derive(Debug)]
pub struct MatrixRows<F> {
    pub m_prev: Vec<F>,
    pub i_prev: Vec<F>,
    pub d_prev: Vec<F>,
    pub m_curr: Vec<F>,
    pub i_curr: Vec<F>,
    pub d_curr: Vec<F>,
}

impl<F: Precision> MatrixRows<F> {
    pub fn new() -> Self {
        MatrixRows {
            m_prev: Vec::new(),
            i_prev: Vec::new(),
            d_prev: Vec::new(),
            m_curr: Vec::new(),
            i_curr: Vec::new(),
            d_curr: Vec::new(),
        }
    }

    /// Size every row for `hap_cols` haplotype positions at the given lane
    /// stride. Keeps capacity across calls; contents are overwritten by the
    /// kernel's boundary initialization, so no clearing happens here.
    pub fn ensure(&mut self, stride: usize, hap_cols: usize) {
        let len = (hap_cols + 1) * stride;
        for row in [
            &mut self.m_prev,
            &mut self.i_prev,
            &mut self.d_prev,
            &mut self.m_curr,
            &mut self.i_curr,
            &mut self.d_curr,
        ] {
            if row.len() < len {
                row.resize(len, F::ZERO);
            }
        }
    }

    /// Make the just-computed rows the previous rows for the next read
    /// position.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.m_prev, &mut self.m_curr);
        std::mem::swap(&mut self.i_prev, &mut self.i_curr);
        std::mem::swap(&mut self.d_prev, &mut self.d_curr);
    }
}

/// Structure-of-arrays inputs for one lane group, plus the rolling rows.
///
/// `pack` converts up to `stride` test cases into the layout the kernel
/// consumes: per-column haplotype bases, per-row read bases, the six
/// transition tracks and the match/mismatch emission pair derived from the
/// quality tracks, and the per-lane boundary mass for the deletion matrix.
#[derive(Debug)]
pub struct LaneBuffers<F> {
    lanes: usize,
    stride: usize,
    max_hap_len: usize,
    max_read_len: usize,

    hap_soa: Vec<F>,
    read_soa: Vec<F>,

    // Transition tracks, one value per read position per lane
    t_match_match: Vec<F>,
    t_indel_match: Vec<F>,
    t_match_ins: Vec<F>,
    t_ins_ins: Vec<F>,
    t_match_del: Vec<F>,
    t_del_del: Vec<F>,

    // Emission pair per read position per lane
    emit_match: Vec<F>,
    emit_mismatch: Vec<F>,

    // Per-lane scalars
    init_d: Vec<F>,
    hap_len: Vec<usize>,
    read_len: Vec<usize>,

    pub rows: MatrixRows<F>,
}

impl<F: Precision> LaneBuffers<F> {
    pub fn new() -> Self {
        LaneBuffers {
            lanes: 0,
            stride: 0,
            max_hap_len: 0,
            max_read_len: 0,
            hap_soa: Vec::new(),
            read_soa: Vec::new(),
            t_match_match: Vec::new(),
            t_indel_match: Vec::new(),
            t_match_ins: Vec::new(),
            t_ins_ins: Vec::new(),
            t_match_del: Vec::new(),
            t_del_del: Vec::new(),
            emit_match: Vec::new(),
            emit_mismatch: Vec::new(),
            init_d: Vec::new(),
            hap_len: Vec::new(),
            read_len: Vec::new(),
            rows: MatrixRows::new(),
        }
    }

    /// Pack a chunk of at most `stride` test cases into SoA form.
    ///
    /// `initial_constant` is the precision tier's scaling constant; each
    /// lane's deletion boundary mass is `initial_constant / hap_len`,
    /// modeling free entry at every haplotype start position.
    pub fn pack(&mut self, chunk: &[&TestCase], stride: usize, initial_constant: f64) {
        assert!(!chunk.is_empty() && chunk.len() <= stride);

        let max_hap_len = chunk.iter().map(|tc| tc.hap_len()).max().unwrap();
        let max_read_len = chunk.iter().map(|tc| tc.read_len()).max().unwrap();

        self.lanes = chunk.len();
        self.stride = stride;
        self.max_hap_len = max_hap_len;
        self.max_read_len = max_read_len;

        let n_base = F::from_f64(BASE_N as f64);
        reuse(&mut self.hap_soa, max_hap_len * stride, n_base);
        reuse(&mut self.read_soa, max_read_len * stride, n_base);

        let row_cells = max_read_len * stride;
        reuse(&mut self.t_match_match, row_cells, F::ZERO);
        reuse(&mut self.t_indel_match, row_cells, F::ZERO);
        reuse(&mut self.t_match_ins, row_cells, F::ZERO);
        reuse(&mut self.t_ins_ins, row_cells, F::ZERO);
        reuse(&mut self.t_match_del, row_cells, F::ZERO);
        reuse(&mut self.t_del_del, row_cells, F::ZERO);
        reuse(&mut self.emit_match, row_cells, F::ZERO);
        reuse(&mut self.emit_mismatch, row_cells, F::ZERO);

        reuse(&mut self.init_d, stride, F::ZERO);
        reuse_usize(&mut self.hap_len, stride);
        reuse_usize(&mut self.read_len, stride);

        for (lane, tc) in chunk.iter().enumerate() {
            self.hap_len[lane] = tc.hap_len();
            self.read_len[lane] = tc.read_len();
            self.init_d[lane] = F::from_f64(initial_constant / tc.hap_len() as f64);

            for (j, &base) in tc.haplotype().iter().enumerate() {
                self.hap_soa[j * stride + lane] = F::from_f64(base as f64);
            }

            let bq = tc.base_quality();
            let iq = tc.insertion_quality();
            let dq = tc.deletion_quality();
            let gq = tc.gap_continuation_quality();
            for (i, &base) in tc.read().iter().enumerate() {
                let off = i * stride + lane;
                self.read_soa[off] = F::from_f64(base as f64);

                let p_err = qual_to_error_prob(bq[i]);
                let p_ins = qual_to_error_prob(iq[i]);
                let p_del = qual_to_error_prob(dq[i]);
                let p_gcp = qual_to_error_prob(gq[i]);

                // Two poor gap qualities can push p_ins + p_del past one;
                // a transition probability must not go negative.
                self.t_match_match[off] = F::from_f64((1.0 - (p_ins + p_del)).max(0.0));
                self.t_indel_match[off] = F::from_f64(1.0 - p_gcp);
                self.t_match_ins[off] = F::from_f64(p_ins);
                self.t_ins_ins[off] = F::from_f64(p_gcp);
                self.t_match_del[off] = F::from_f64(p_del);
                self.t_del_del[off] = F::from_f64(p_gcp);

                self.emit_match[off] = F::from_f64(1.0 - p_err);
                self.emit_mismatch[off] = F::from_f64(p_err / 3.0);
            }
        }

        self.rows.ensure(stride, max_hap_len);
    }

    /// Borrow the packed inputs and the rolling rows for one kernel call.
    pub fn kernel_io(&mut self) -> (KernelInputs<'_, F>, &mut MatrixRows<F>) {
        let inputs = KernelInputs {
            hap_soa: &self.hap_soa,
            read_soa: &self.read_soa,
            t_match_match: &self.t_match_match,
            t_indel_match: &self.t_indel_match,
            t_match_ins: &self.t_match_ins,
            t_ins_ins: &self.t_ins_ins,
            t_match_del: &self.t_match_del,
            t_del_del: &self.t_del_del,
            emit_match: &self.emit_match,
            emit_mismatch: &self.emit_mismatch,
            init_d: &self.init_d,
            hap_len: &self.hap_len,
            read_len: &self.read_len,
            lanes: self.lanes,
            stride: self.stride,
            max_hap_len: self.max_hap_len,
            max_read_len: self.max_read_len,
        };
        (inputs, &mut self.rows)
    }
}

impl<F: Precision> Default for MatrixRows<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Precision> Default for LaneBuffers<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn reuse<F: Copy>(v: &mut Vec<F>, len: usize, fill: F) {
    v.clear();
    v.resize(len, fill);
}

fn reuse_usize(v: &mut Vec<usize>, len: usize) {
    v.clear();
    v.resize(len, 0);
}
