//! USB robot arm over Linux usbfs.
//!
//! Finds the device through sysfs, opens its /dev/bus/usb node and sends each
//! move as a vendor control transfer.

use async_trait::async_trait;
use robopi_common::{ActuatorError, ArmConfig, MoveCode};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::Actuator;

const USB_DEVICES: &str = "/sys/bus/usb/devices";

const REQUEST_TYPE: u8 = 0x40; // vendor, host-to-device, recipient device
const REQUEST: u8 = 6;
const VALUE: u16 = 0x100;
const INDEX: u16 = 0;

/// `struct usbdevfs_ctrltransfer`
#[repr(C)]
pub struct CtrlTransfer {
    request_type: u8,
    request: u8,
    value: u16,
    index: u16,
    length: u16,
    timeout: u32,
    data: *mut libc::c_void,
}

nix::ioctl_readwrite!(usbdevfs_control, b'U', 0, CtrlTransfer);

pub struct UsbArm {
    device: Arc<File>,
    path: PathBuf,
    timeout_ms: u32,
}

impl UsbArm {
    pub fn open(config: &ArmConfig) -> Result<Self, ActuatorError> {
        let path = find_device(Path::new(USB_DEVICES), config.vendor_id, config.product_id)?
            .ok_or(ActuatorError::DeviceNotFound {
                vendor_id: config.vendor_id,
                product_id: config.product_id,
            })?;

        let device = OpenOptions::new().read(true).write(true).open(&path)?;
        info!("Opened robot arm at {}", path.display());

        Ok(Self {
            device: Arc::new(device),
            path,
            timeout_ms: config.transfer_timeout_ms,
        })
    }
}

#[async_trait]
impl Actuator for UsbArm {
    async fn apply_raw(&mut self, code: MoveCode) -> Result<(), ActuatorError> {
        let device = Arc::clone(&self.device);
        let timeout_ms = self.timeout_ms;

        tokio::task::spawn_blocking(move || control_transfer(&device, code, timeout_ms))
            .await
            .map_err(|e| ActuatorError::Transfer {
                code,
                reason: e.to_string(),
            })?
    }

    fn name(&self) -> String {
        format!("USB arm {}", self.path.display())
    }
}

fn control_transfer(device: &File, code: MoveCode, timeout_ms: u32) -> Result<(), ActuatorError> {
    let mut payload = code.as_bytes();
    let mut transfer = CtrlTransfer {
        request_type: REQUEST_TYPE,
        request: REQUEST,
        value: VALUE,
        index: INDEX,
        length: payload.len() as u16,
        timeout: timeout_ms,
        data: payload.as_mut_ptr().cast(),
    };

    debug!("Control transfer [{}]", code);
    // SAFETY: `transfer.data` points at `payload`, which holds `length` bytes
    // and outlives the ioctl.
    unsafe { usbdevfs_control(device.as_raw_fd(), &mut transfer) }.map_err(|errno| {
        ActuatorError::Transfer {
            code,
            reason: errno.to_string(),
        }
    })?;
    Ok(())
}

/// Scan sysfs for the device and return its usbfs node.
fn find_device(root: &Path, vendor_id: u16, product_id: u16) -> io::Result<Option<PathBuf>> {
    for entry in fs::read_dir(root)? {
        let dir = entry?.path();

        let matches = read_attr(&dir, "idVendor").and_then(|v| parse_hex_id(&v)) == Some(vendor_id)
            && read_attr(&dir, "idProduct").and_then(|p| parse_hex_id(&p)) == Some(product_id);
        if !matches {
            continue;
        }

        let bus = read_attr(&dir, "busnum").and_then(|b| b.trim().parse::<u16>().ok());
        let dev = read_attr(&dir, "devnum").and_then(|d| d.trim().parse::<u16>().ok());
        if let (Some(bus), Some(dev)) = (bus, dev) {
            return Ok(Some(usbfs_path(bus, dev)));
        }
    }
    Ok(None)
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name)).ok()
}

fn parse_hex_id(text: &str) -> Option<u16> {
    u16::from_str_radix(text.trim(), 16).ok()
}

fn usbfs_path(bus: u16, dev: u16) -> PathBuf {
    PathBuf::from(format!("/dev/bus/usb/{:03}/{:03}", bus, dev))
}
