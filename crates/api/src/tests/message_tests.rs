// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, MessageInfo, SendMessageRequest, ShipmentInfo, list_messages, send_message,
};

use super::helpers::{create_accepted_shipment, create_test_shipment, setup};

fn message_to(shipment_id: i64, receiver_id: i64, text: &str) -> SendMessageRequest {
    SendMessageRequest {
        shipment_id,
        receiver_id,
        message: text.to_string(),
    }
}

#[test]
fn test_participants_exchange_messages_in_order() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);

    let first: MessageInfo = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.agent.user_id, "When can you pick up?"),
        &ctx.partner,
    )
    .unwrap();
    let second: MessageInfo = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.partner.user_id, "Tomorrow morning"),
        &ctx.agent,
    )
    .unwrap();

    let thread: Vec<MessageInfo> =
        list_messages(&mut ctx.persistence, shipment.id, &ctx.partner).unwrap();
    let ids: Vec<i64> = thread.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(thread[0].message, "When can you pick up?");
    assert_eq!(thread[1].sender_id, ctx.agent.user_id);
}

#[test]
fn test_reading_marks_only_the_readers_messages() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);
    send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.agent.user_id, "Is the truck ready?"),
        &ctx.partner,
    )
    .unwrap();

    // The sender reading the thread leaves the message unread
    let partner_view: Vec<MessageInfo> =
        list_messages(&mut ctx.persistence, shipment.id, &ctx.partner).unwrap();
    assert_eq!(partner_view[0].is_read, 0);

    let agent_view: Vec<MessageInfo> =
        list_messages(&mut ctx.persistence, shipment.id, &ctx.agent).unwrap();
    assert_eq!(agent_view[0].is_read, 1);
}

#[test]
fn test_admin_can_join_any_thread() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);

    let sent: MessageInfo = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.partner.user_id, "Payment received"),
        &ctx.admin,
    )
    .unwrap();
    assert_eq!(sent.sender_id, ctx.admin.user_id);

    let reply: MessageInfo = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.admin.user_id, "Thanks"),
        &ctx.partner,
    )
    .unwrap();
    assert_eq!(reply.receiver_id, ctx.admin.user_id);
}

#[test]
fn test_outsiders_cannot_send_or_read() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);

    let send = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.partner.user_id, "Can I help?"),
        &ctx.other_agent,
    );
    let read = list_messages(&mut ctx.persistence, shipment.id, &ctx.other_partner);

    assert!(matches!(send, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(read, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_unassigned_shipment_has_no_agent_participant() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_test_shipment(&mut ctx);

    let result = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.partner.user_id, "I can take this"),
        &ctx.agent,
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_receiver_must_be_someone_else_on_the_shipment() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);

    let to_self = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.partner.user_id, "Note to self"),
        &ctx.partner,
    );
    let to_outsider = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.other_agent.user_id, "Are you free?"),
        &ctx.partner,
    );
    let to_nobody = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, 9999, "Hello?"),
        &ctx.partner,
    );

    assert!(matches!(
        to_self,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "receiverId"
    ));
    assert!(matches!(
        to_outsider,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "receiverId"
    ));
    assert!(matches!(to_nobody, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_blank_message_is_rejected() {
    let mut ctx = setup();
    let shipment: ShipmentInfo = create_accepted_shipment(&mut ctx);

    let result = send_message(
        &mut ctx.persistence,
        &message_to(shipment.id, ctx.agent.user_id, "   "),
        &ctx.partner,
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "message"
    ));
}

#[test]
fn test_messages_on_unknown_shipment_are_not_found() {
    let mut ctx = setup();

    let result = list_messages(&mut ctx.persistence, 4242, &ctx.partner);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
