//! Value types of expressions and the assignment compatibility rules.

use std::fmt;

use lexa_syntax::ast::{BinaryOp, DataType, Literal, UnaryOp};

/// Type of an expression. `Unknown` is compatible with everything so one
/// undeclared name or one bad operand does not cascade into mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Double,
    String,
    Char,
    Bool,
    Void,
    Unknown,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Char => "char",
            ValueType::Bool => "bool",
            ValueType::Void => "void",
            ValueType::Unknown => "unknown",
        }
    }

    fn numeric_rank(self) -> Option<u8> {
        match self {
            ValueType::Int => Some(0),
            ValueType::Float => Some(1),
            ValueType::Double => Some(2),
            _ => None,
        }
    }

    fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Types that can stand where a condition is expected.
    fn is_truthy(self) -> bool {
        self == ValueType::Bool || self.is_numeric()
    }

    /// `Unknown` and `Void` come from names that already have a diagnostic.
    fn is_reported(self) -> bool {
        matches!(self, ValueType::Unknown | ValueType::Void)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<DataType> for ValueType {
    fn from(ty: DataType) -> Self {
        match ty {
            DataType::Int => ValueType::Int,
            DataType::Float => ValueType::Float,
            DataType::Double => ValueType::Double,
            DataType::String => ValueType::String,
            DataType::Char => ValueType::Char,
            DataType::Bool => ValueType::Bool,
            DataType::Void => ValueType::Void,
        }
    }
}

impl From<Literal> for ValueType {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int => ValueType::Int,
            Literal::Float => ValueType::Float,
            Literal::String => ValueType::String,
            Literal::Char => ValueType::Char,
            Literal::Bool => ValueType::Bool,
        }
    }
}

/// Can a value of type `value` be stored in a variable declared as `target`?
pub fn is_assignable(target: DataType, value: ValueType) -> bool {
    if value.is_reported() {
        return true;
    }
    match target {
        DataType::Int => value == ValueType::Int,
        DataType::Float | DataType::Double => value.numeric_rank().is_some(),
        DataType::String => value == ValueType::String,
        DataType::Char => value == ValueType::Char,
        DataType::Bool => matches!(value, ValueType::Bool | ValueType::Int),
        // reported separately as a void variable
        DataType::Void => true,
    }
}

/// Result type of `op operand`, or `None` when the operator does not apply.
pub fn unary_result(op: UnaryOp, operand: ValueType) -> Option<ValueType> {
    if operand.is_reported() {
        return Some(ValueType::Unknown);
    }
    match op {
        UnaryOp::Not if operand.is_truthy() => Some(ValueType::Bool),
        UnaryOp::Not => None,
        _ if operand.is_numeric() => Some(operand),
        _ => None,
    }
}

/// Result type of `lhs op rhs`, or `None` when the operator does not apply to
/// these operand types.
pub fn binary_result(op: BinaryOp, lhs: ValueType, rhs: ValueType) -> Option<ValueType> {
    if lhs.is_reported() || rhs.is_reported() {
        return Some(ValueType::Unknown);
    }
    let numeric = lhs.is_numeric() && rhs.is_numeric();
    match op {
        BinaryOp::And | BinaryOp::Or => (lhs.is_truthy() && rhs.is_truthy()).then_some(ValueType::Bool),
        BinaryOp::Eq | BinaryOp::Ne => {
            let bool_int = matches!(
                (lhs, rhs),
                (ValueType::Bool, ValueType::Int) | (ValueType::Int, ValueType::Bool)
            );
            (lhs == rhs || numeric || bool_int).then_some(ValueType::Bool)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordered_text = lhs == rhs && matches!(lhs, ValueType::Char | ValueType::String);
            (numeric || ordered_text).then_some(ValueType::Bool)
        }
        BinaryOp::Add if lhs == ValueType::String && rhs == ValueType::String => Some(ValueType::String),
        BinaryOp::Rem => (lhs == ValueType::Int && rhs == ValueType::Int).then_some(ValueType::Int),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            match (lhs.numeric_rank(), rhs.numeric_rank()) {
                (Some(a), Some(b)) if a >= b => Some(lhs),
                (Some(_), Some(_)) => Some(rhs),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignability_table() {
        assert!(is_assignable(DataType::Int, ValueType::Int));
        assert!(!is_assignable(DataType::Int, ValueType::Float));
        assert!(!is_assignable(DataType::Int, ValueType::String));
        assert!(is_assignable(DataType::Double, ValueType::Int));
        assert!(is_assignable(DataType::Float, ValueType::Double));
        assert!(!is_assignable(DataType::Float, ValueType::Bool));
        assert!(is_assignable(DataType::String, ValueType::String));
        assert!(!is_assignable(DataType::String, ValueType::Char));
        assert!(is_assignable(DataType::Char, ValueType::Char));
        assert!(is_assignable(DataType::Bool, ValueType::Int));
        assert!(!is_assignable(DataType::Bool, ValueType::String));
        assert!(is_assignable(DataType::Int, ValueType::Unknown));
    }

    #[test]
    fn arithmetic_widens() {
        use ValueType::*;
        assert_eq!(binary_result(BinaryOp::Add, Int, Int), Some(Int));
        assert_eq!(binary_result(BinaryOp::Mul, Int, Float), Some(Float));
        assert_eq!(binary_result(BinaryOp::Sub, Double, Float), Some(Double));
        assert_eq!(binary_result(BinaryOp::Add, String, String), Some(String));
        assert_eq!(binary_result(BinaryOp::Rem, Int, Int), Some(Int));
        assert_eq!(unary_result(UnaryOp::Neg, Float), Some(Float));
        assert_eq!(unary_result(UnaryOp::PostIncrement, Int), Some(Int));
    }

    #[test]
    fn comparisons_and_logic_give_bool() {
        use ValueType::*;
        assert_eq!(binary_result(BinaryOp::Lt, Int, Float), Some(Bool));
        assert_eq!(binary_result(BinaryOp::Ge, Char, Char), Some(Bool));
        assert_eq!(binary_result(BinaryOp::Eq, String, String), Some(Bool));
        assert_eq!(binary_result(BinaryOp::Ne, Bool, Int), Some(Bool));
        assert_eq!(binary_result(BinaryOp::And, Bool, Int), Some(Bool));
        assert_eq!(unary_result(UnaryOp::Not, Int), Some(Bool));
    }

    #[test]
    fn operators_reject_foreign_operands() {
        use ValueType::*;
        assert_eq!(binary_result(BinaryOp::Sub, String, Int), None);
        assert_eq!(binary_result(BinaryOp::Add, Int, String), None);
        assert_eq!(binary_result(BinaryOp::Add, Bool, Int), None);
        assert_eq!(binary_result(BinaryOp::Sub, String, String), None);
        assert_eq!(binary_result(BinaryOp::Rem, Int, Float), None);
        assert_eq!(binary_result(BinaryOp::Lt, String, Int), None);
        assert_eq!(binary_result(BinaryOp::Eq, Char, String), None);
        assert_eq!(binary_result(BinaryOp::Or, String, Bool), None);
        assert_eq!(unary_result(UnaryOp::Neg, String), None);
        assert_eq!(unary_result(UnaryOp::PreIncrement, Bool), None);
        assert_eq!(unary_result(UnaryOp::Not, Char), None);
    }

    #[test]
    fn reported_operands_do_not_cascade() {
        use ValueType::*;
        assert_eq!(binary_result(BinaryOp::Sub, Unknown, String), Some(Unknown));
        assert_eq!(binary_result(BinaryOp::Mul, Int, Void), Some(Unknown));
        assert_eq!(unary_result(UnaryOp::Neg, Unknown), Some(Unknown));
        assert!(is_assignable(DataType::String, Void));
    }
}
