//! Loopback example: send telemetry frames through a noisy in-memory link

use bytes::BytesMut;
use uavlink::protocol::{HexDisplay, encode_into};
use uavlink::transport::MemoryTransport;
use uavlink::{Address, Endianness, Frame, FrameConfig, FrameLink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("uavlink Loopback Example");
    println!("========================\n");

    let config = FrameConfig::default();
    let ground = Address::new(0, 0);
    let drone = Address::new(1, 7);

    let mut uplink = FrameLink::new(MemoryTransport::new(), config);
    for seq in 0u16..3 {
        let mut payload = BytesMut::new();
        encode_into(seq, Endianness::Little, &mut payload);
        encode_into(120.0_f32 + f32::from(seq), Endianness::Big, &mut payload);
        let frame = Frame::new(drone, ground, payload.freeze())?;
        let written = uplink.send(&frame)?;
        println!("Sent frame {seq}: {written} bytes");
    }

    // Line noise in front of the captured bytes
    let mut wire = vec![0x00, 0x13, 0xAA];
    wire.extend(uplink.transport_mut().take_written());
    println!("On the wire: {}", HexDisplay(&wire));

    let mut downlink = FrameLink::new(MemoryTransport::new().with_max_read(5), config);
    downlink.transport_mut().feed(&wire);

    while downlink.transport().pending() > 0 {
        for frame in downlink.poll()? {
            let seq: u16 = uavlink::protocol::decode(frame.payload(), 0, Endianness::Little)?;
            let altitude: f32 = uavlink::protocol::decode(frame.payload(), 2, Endianness::Big)?;
            println!(
                "Received from {}: seq={seq}, altitude={altitude}",
                frame.sender()
            );
        }
    }

    let stats = downlink.stats();
    println!(
        "\nDecoded {} frames, discarded {} noise bytes",
        stats.frames, stats.discarded_bytes
    );

    Ok(())
}
