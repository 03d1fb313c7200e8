#[cfg(test)]
mod tests {
    use crate::{
        Op, Ring, RingConfig, RingError,
        config::BASE_V_FACTOR_VAR,
        tests::helpers::Payload,
    };

    #[test]
    fn default_config_is_valid() {
        let config = RingConfig::<Payload>::default();

        assert_eq!(config.base_v_factor, 1);
        assert!(config.validate().is_ok());
        assert_eq!((config.hash)("1"), 14180219187711517570);
        assert_eq!((config.slice_name)("A", 1), "A1");
    }

    #[test]
    fn zero_base_v_factor_is_rejected() {
        let err = Ring::new(RingConfig::<Payload>::default().with_base_v_factor(0)).unwrap_err();
        assert_eq!(err, RingError::InvalidBaseVFactor);
    }

    #[test]
    fn from_lookup_reads_base_v_factor() {
        let config = RingConfig::<Payload>::from_lookup(|name| {
            (name == BASE_V_FACTOR_VAR).then(|| " 4 ".to_string())
        })
        .expect("valid value");

        assert_eq!(config.base_v_factor, 4);
    }

    #[test]
    fn from_lookup_without_variables_keeps_defaults() {
        let config = RingConfig::<Payload>::from_lookup(|_| None).expect("defaults");
        assert_eq!(config.base_v_factor, 1);
    }

    #[test]
    fn from_lookup_rejects_garbage_and_zero() {
        let err = RingConfig::<Payload>::from_lookup(|_| Some("-1".into())).unwrap_err();
        assert!(matches!(err, RingError::Config(msg) if msg.contains(BASE_V_FACTOR_VAR)));

        let err = RingConfig::<Payload>::from_lookup(|_| Some("0".into())).unwrap_err();
        assert_eq!(err, RingError::InvalidBaseVFactor);
    }

    #[test]
    fn custom_filter_drives_routing_key() {
        let ring = Ring::new(
            RingConfig::<Payload>::default()
                .with_filter(|op: &Op<Payload>| format!("{}{}", op.node_id(), op.ring_change)),
        )
        .expect("valid");

        let template = Op::for_node("A").ring_change(true);
        assert_eq!(ring.hub.routing_key(&template), "Atrue");
        assert_eq!(ring.hub.routing_key(&Op::for_node("A")), "Afalse");
    }
}
