/// The rules applied during simplification, in the order they were applied.
///
/// Steps are collected by any [`StepCollector`](crate::symbolic::StepCollector); the
/// [`Budget`](super::Budget) only counts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FlattenSum,
    AddZero,
    CombineLikeTerms,
    FlattenProduct,
    MultiplyZero,
    MultiplyOne,
    ReduceFraction,
    CombineLikeFactors,
    DistributiveProperty,
    DistributePower,
    PowerZero,
    PowerOne,
    OnePower,
    ZeroPower,
    EvaluatePower,
    PowerOfPower,
    ExpandBinomial,
    Root,
    ImaginaryPower,
    SqrtNegative,
    Decimal,
    Factorial,
    Abs,
    LogBase,
    LogOne,
    LogE,
    ExpLog,
    LogProduct,
    LogPower,
    LogExp,
    Sin,
    Cos,
    Tan,
    Parity,
    Pythagorean,
    TrigToSinCos,
    AngleSum,
    MultipleAngle,
}
