pub mod binary_packing;
pub mod bitpacking;
pub mod codec;
pub mod composition;
pub mod delta_zigzag_binary_packing;
pub mod delta_zigzag_variable_byte;
pub mod differential;
pub mod exception_coder;
pub mod fastpfor;
pub mod helpers;
pub mod integer_codec;
pub mod just_copy;
pub mod newpfd;
pub mod optpfd;
pub mod simple16;
pub mod simple9;
pub mod skippable_codec;
pub mod variable_byte;
