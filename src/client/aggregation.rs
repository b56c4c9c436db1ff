/// 브로드캐스트 응답 집계 정책
///
/// 쿼럼이나 다수결은 일부러 없다. 추적 순서상 가장 앞에 있는 성공 응답을 그대로 쓰므로,
/// 돌려준 값이 같은 브로드캐스트에서 뒤에 있던 레플리카보다 뒤처져 있을 수 있다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum AggregationPolicy {
    /// 추적 순서상 첫 번째 성공 응답
    #[default]
    FirstSuccess,
}

impl AggregationPolicy {
    /// 추적 순서대로 정렬된 성공 응답 중 하나를 고른다
    pub fn select<T>(&self, successes: Vec<T>) -> Option<T> {
        match self {
            AggregationPolicy::FirstSuccess => successes.into_iter().next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_ignores_majority() {
        let policy = AggregationPolicy::default();
        assert_eq!(policy.select(vec!["lagging", "ahead", "ahead"]), Some("lagging"));
        assert_eq!(policy.select(Vec::<u8>::new()), None);
    }
}
