use crate::arp::ArpHandler;
use crate::health::HealthHandler;
use crate::interface_legacy::InterfaceLegacyHandler;
use crate::interfaces::InterfaceDiscoveryHandler;
use crate::mac_legacy::MacLegacyHandler;
use crate::mac_table::MacTableHandler;
use crate::snmp_raw::SnmpRawHandler;
use crate::stub::StubHandler;
use crate::{Handler, HandlerError};

/// Maps a `mon.request_group.handler_id` to a concrete [`Handler`].
///
/// `use_stub_handlers` is read fresh on every call rather than cached once
/// at startup, so a live agent can be flipped to stub mode (or back) by an
/// operator without a restart (Open Question decided in favor of
/// per-invocation freshness).
pub struct HandlerFactory;

impl HandlerFactory {
    pub fn create(handler_id: i32, use_stub_handlers: bool) -> Result<Box<dyn Handler>, HandlerError> {
        if use_stub_handlers {
            return Ok(Box::new(StubHandler));
        }

        let handler: Box<dyn Handler> = match handler_id {
            1 => Box::new(SnmpRawHandler),
            2 => Box::new(MacLegacyHandler::default()),
            3 => Box::new(InterfaceLegacyHandler::default()),
            4 => Box::new(InterfaceDiscoveryHandler),
            5 => Box::new(MacTableHandler),
            6 => Box::new(ArpHandler),
            7 => Box::new(HealthHandler),
            99 => Box::new(StubHandler),
            other => return Err(HandlerError::UnknownHandlerId(other)),
        };
        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_flag_overrides_handler_id() {
        let handler = HandlerFactory::create(7, true).unwrap();
        assert_eq!(handler.name(), "stub");
    }

    #[test]
    fn unknown_handler_id_errors() {
        let result = HandlerFactory::create(123, false);
        assert!(matches!(result, Err(HandlerError::UnknownHandlerId(123))));
    }

    #[test]
    fn legacy_and_dedicated_ids_both_resolve() {
        assert_eq!(HandlerFactory::create(2, false).unwrap().name(), "mac_legacy");
        assert_eq!(HandlerFactory::create(5, false).unwrap().name(), "mac_table");
        assert_eq!(HandlerFactory::create(3, false).unwrap().name(), "interface_legacy");
        assert_eq!(HandlerFactory::create(4, false).unwrap().name(), "interface_discovery");
    }
}
