use intcodec::{
    BinaryPacking, Codec, DeltaZigzagBinaryPacking, DeltaZigzagVariableByte, FastPFOR,
    IntegratedBinaryPacking, IntegratedComposition, IntegratedVariableByte, JustCopy, NewPFDS16,
    NewPFDS9, OptPFDS16, OptPFDS9, Simple16, Simple9, VariableByte, XorBinaryPacking,
    BLOCK_SIZE_128, BLOCK_SIZE_256, DEFAULT_PAGE_SIZE,
};

#[derive(arbitrary::Arbitrary)]
pub struct FuzzInput<C> {
    pub data: Vec<u32>,
    pub codec: C,
}

impl<C: std::fmt::Debug> std::fmt::Debug for FuzzInput<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzInput")
            .field("codec", &self.codec)
            .field("data", &HexSlice(&self.data))
            .finish()
    }
}

#[derive(arbitrary::Arbitrary, Clone, Copy, PartialEq, Eq, Debug)]
pub enum FuzzCodec {
    JustCopy,
    VariableByte,
    IntegratedVariableByte,
    DeltaZigzagVariableByte,
    Simple9,
    Simple16,
    BinaryPacking,
    IntegratedBinaryPacking,
    DeltaZigzagBinaryPacking,
    XorBinaryPacking,
    NewPFDS9,
    NewPFDS16,
    OptPFDS9,
    OptPFDS16,
    FastPFOR256,
    FastPFOR128,
    IntegratedComposition,
}

impl FuzzCodec {
    /// Whether values must stay below `2^28`.
    pub fn small_values_only(self) -> bool {
        matches!(self, FuzzCodec::Simple9 | FuzzCodec::Simple16)
    }
}

impl From<FuzzCodec> for Codec {
    fn from(codec: FuzzCodec) -> Self {
        let tail = VariableByte::new;
        match codec {
            FuzzCodec::JustCopy => JustCopy::new().into(),
            FuzzCodec::VariableByte => VariableByte::new().into(),
            FuzzCodec::IntegratedVariableByte => IntegratedVariableByte::new().into(),
            FuzzCodec::DeltaZigzagVariableByte => DeltaZigzagVariableByte::new().into(),
            FuzzCodec::Simple9 => Simple9::new().into(),
            FuzzCodec::Simple16 => Simple16::new().into(),
            FuzzCodec::BinaryPacking => Codec::compose(BinaryPacking::new(), tail()),
            FuzzCodec::IntegratedBinaryPacking => {
                Codec::compose(IntegratedBinaryPacking::new(), tail())
            }
            FuzzCodec::DeltaZigzagBinaryPacking => {
                Codec::compose(DeltaZigzagBinaryPacking::new(), tail())
            }
            FuzzCodec::XorBinaryPacking => Codec::compose(XorBinaryPacking::new(), tail()),
            FuzzCodec::NewPFDS9 => Codec::compose(NewPFDS9::new(), tail()),
            FuzzCodec::NewPFDS16 => Codec::compose(NewPFDS16::new(), tail()),
            FuzzCodec::OptPFDS9 => Codec::compose(OptPFDS9::new(), tail()),
            FuzzCodec::OptPFDS16 => Codec::compose(OptPFDS16::new(), tail()),
            FuzzCodec::FastPFOR256 => Codec::compose(
                FastPFOR::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_256),
                tail(),
            ),
            FuzzCodec::FastPFOR128 => Codec::compose(
                FastPFOR::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128),
                tail(),
            ),
            FuzzCodec::IntegratedComposition => IntegratedComposition::new(
                IntegratedBinaryPacking::new(),
                IntegratedVariableByte::new(),
            )
            .into(),
        }
    }
}

pub struct HexSlice<'a>(pub &'a [u32]);

impl std::fmt::Debug for HexSlice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MAX: usize = 20;

        let total = self.0.len();
        let shown = total.min(MAX);

        let mut list = f.debug_list();

        for v in &self.0[..shown] {
            list.entry(&format_args!("{v:#010x}"));
        }

        if total > MAX {
            list.entry(&format_args!(".. out of {total} total"));
        }

        list.finish()
    }
}
