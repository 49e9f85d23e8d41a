pub mod error;
pub mod scope;
pub mod value;

pub mod operations {
    pub mod arithmetic;
    pub mod test_and_comparison;
    pub mod type_conversion;
}
